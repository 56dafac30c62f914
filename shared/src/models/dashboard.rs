//! Dashboard aggregate counts

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub users: i64,
    pub branches: i64,
    pub products: i64,
    pub history_entries: i64,
    pub activity_entries: i64,
    /// Products whose derived stock is below zero
    pub negative_stock: i64,
    /// Per-branch product counts, only branches visible to the caller
    pub products_by_branch: Vec<BranchProductCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct BranchProductCount {
    pub branch: String,
    pub products: i64,
}
