//! Activity Log Model

use serde::{Deserialize, Serialize};

/// One audit trail line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogEntry {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub action: String,
    /// Unix millis
    pub timestamp: i64,
}

/// Append payload; username and role come from the caller's token
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityLogCreate {
    #[serde(default)]
    pub action: String,
}

/// Result of clearing the log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLogCleared {
    pub removed: u64,
}
