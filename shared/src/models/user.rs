//! User Model

use serde::{Deserialize, Serialize};

/// User response (without password)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub created_at: i64,
}

/// Create user payload (admin only, role is honoured)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Parsed into [`super::Role`] by the server
    #[serde(default)]
    pub role: String,
}

/// Update user payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}
