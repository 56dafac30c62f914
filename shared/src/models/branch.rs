//! Branch Model
//!
//! A branch is addressed two ways:
//! - products by [`BranchKey`]: display name lowercased, all whitespace removed
//! - history by [`history_key`]: display name upper-cased
//!
//! Both forms are derived here and nowhere else.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical branch key used to select a branch's product collection
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BranchKey(String);

impl BranchKey {
    /// Normalize a free-text branch name. Returns `None` for blank input.
    pub fn normalize(name: &str) -> Option<Self> {
        let key: String = name
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        if key.is_empty() { None } else { Some(Self(key)) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BranchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BranchKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Lookup key for history entries: the branch name upper-cased.
///
/// Applied on both write and read so any casing round-trips.
pub fn history_key(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Registered branch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: i64,
    /// Canonical key (see [`BranchKey`])
    pub key: String,
    /// Display name as configured
    pub name: String,
    pub created_at: i64,
}
