//! Role Model
//!
//! Role strings on the wire and in the database encode two things:
//!
//! | String | Privilege | Branch |
//! |--------|-----------|--------|
//! | `Admin` | Admin | all |
//! | `User` | User | all |
//! | `Manager-<branch>` | Manager | `<branch>` |
//! | `Staff-<branch>` | Staff | `<branch>` |
//!
//! The branch segment is everything after the first `-` and may itself
//! contain hyphens (e.g. `Staff-Luzon-Main`). Strings are parsed once into
//! [`Role`] at the boundary; nothing else splits role strings.

use super::branch::BranchKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Privilege level, ordered from most to least privileged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Privilege {
    Admin,
    Manager,
    Staff,
    User,
}

impl Privilege {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Manager => "Manager",
            Self::Staff => "Staff",
            Self::User => "User",
        }
    }

    /// Whether this privilege level carries a branch assignment
    pub fn is_branch_scoped(&self) -> bool {
        matches!(self, Self::Manager | Self::Staff)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoleParseError {
    #[error("unknown role: {0}")]
    Unknown(String),
    #[error("role {0} requires a branch, e.g. {0}-<branch>")]
    MissingBranch(&'static str),
    #[error("role {0} does not take a branch")]
    UnexpectedBranch(&'static str),
}

/// Decomposed role: privilege plus optional branch scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Role {
    privilege: Privilege,
    /// Branch segment as written, only for Manager/Staff
    branch: Option<String>,
    /// Normalized form of `branch`
    branch_key: Option<BranchKey>,
}

impl Role {
    pub fn admin() -> Self {
        Self {
            privilege: Privilege::Admin,
            branch: None,
            branch_key: None,
        }
    }

    /// Lowest privilege, assigned to every self-registered account
    pub fn user() -> Self {
        Self {
            privilege: Privilege::User,
            branch: None,
            branch_key: None,
        }
    }

    pub fn privilege(&self) -> Privilege {
        self.privilege
    }

    pub fn is_admin(&self) -> bool {
        self.privilege == Privilege::Admin
    }

    /// Branch segment as written in the role string
    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    /// Branch this role is confined to, `None` when unscoped
    pub fn branch_scope(&self) -> Option<&BranchKey> {
        self.branch_key.as_ref()
    }

    /// Whether this role may read or mutate data of `branch`
    pub fn can_access(&self, branch: &BranchKey) -> bool {
        match &self.branch_key {
            Some(scope) => scope == branch,
            None => true,
        }
    }

    /// Only admins may move the baseline fields (begInventory, waste, withdrawal)
    pub fn can_edit_baseline(&self) -> bool {
        self.is_admin()
    }
}

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (head, branch) = match s.split_once('-') {
            Some((head, rest)) => (head, Some(rest.trim())),
            None => (s, None),
        };

        let privilege = match head.to_ascii_lowercase().as_str() {
            "admin" => Privilege::Admin,
            "manager" => Privilege::Manager,
            "staff" => Privilege::Staff,
            "user" => Privilege::User,
            _ => return Err(RoleParseError::Unknown(s.to_string())),
        };

        match (privilege.is_branch_scoped(), branch) {
            (true, Some(branch)) => {
                let branch_key = BranchKey::normalize(branch)
                    .ok_or(RoleParseError::MissingBranch(privilege.as_str()))?;
                Ok(Self {
                    privilege,
                    branch: Some(branch.to_string()),
                    branch_key: Some(branch_key),
                })
            }
            (true, None) => Err(RoleParseError::MissingBranch(privilege.as_str())),
            (false, Some(_)) => Err(RoleParseError::UnexpectedBranch(privilege.as_str())),
            (false, None) => Ok(Self {
                privilege,
                branch: None,
                branch_key: None,
            }),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = RoleParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.branch {
            Some(branch) => write!(f, "{}-{}", self.privilege.as_str(), branch),
            None => f.write_str(self.privilege.as_str()),
        }
    }
}
