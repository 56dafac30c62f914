//! History Model (库存历史快照)

use super::product::ProductSnapshot;
use serde::{Deserialize, Serialize};

/// Immutable snapshot of one branch's product list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: i64,
    /// Branch name as supplied by the caller
    pub branch: String,
    /// Snapshot time (Unix millis)
    pub date: i64,
    pub submitted_by: Option<String>,
    /// Products in the order they were archived
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub products: Vec<ProductSnapshot>,
}

/// Explicit save payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryCreate {
    #[serde(default)]
    pub branch: String,
    /// Defaults to now
    pub date: Option<i64>,
    #[serde(default)]
    pub products: Vec<ProductSnapshot>,
}

/// Result of an inventory submission
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResult {
    pub history_id: i64,
    pub branch: String,
    /// Products copied into the history entry
    pub archived: usize,
    /// Products re-baselined; may be less than `archived` on partial failure
    pub modified: u64,
}
