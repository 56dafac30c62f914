//! 操作日志
//!
//! 记录用户操作 (登录、商品增删改、库存提交等)。
//! 写入失败只记录告警，不影响已经完成的主操作。

use std::fmt;

use shared::models::ActivityLogEntry;
use sqlx::SqlitePool;

use crate::auth::CurrentUser;
use crate::db::repository::activity_log;

/// 操作类型
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Login,
    Logout,
    Register,
    ProductAdded { branch: String, name: String },
    ProductUpdated { branch: String, name: String },
    ProductDeleted { branch: String, name: String },
    InventorySubmitted { branch: String, items: usize },
    HistorySaved { branch: String, items: usize },
    UserCreated { username: String },
    UserUpdated { username: String },
    UserDeleted { username: String },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => write!(f, "Logged in"),
            Self::Logout => write!(f, "Logged out"),
            Self::Register => write!(f, "Registered an account"),
            Self::ProductAdded { branch, name } => write!(f, "Added product {name} ({branch})"),
            Self::ProductUpdated { branch, name } => {
                write!(f, "Updated product {name} ({branch})")
            }
            Self::ProductDeleted { branch, name } => {
                write!(f, "Deleted product {name} ({branch})")
            }
            Self::InventorySubmitted { branch, items } => {
                write!(f, "Submitted inventory for {branch} ({items} items)")
            }
            Self::HistorySaved { branch, items } => {
                write!(f, "Saved history for {branch} ({items} items)")
            }
            Self::UserCreated { username } => write!(f, "Created user {username}"),
            Self::UserUpdated { username } => write!(f, "Updated user {username}"),
            Self::UserDeleted { username } => write!(f, "Deleted user {username}"),
        }
    }
}

/// Append an entry for `user`. Failures are logged and swallowed.
pub async fn record(pool: &SqlitePool, user: &CurrentUser, action: Action) {
    record_as(pool, &user.username, &user.role.to_string(), action).await;
}

/// Append an entry for an actor that has no token yet (login, register).
pub async fn record_as(pool: &SqlitePool, username: &str, role: &str, action: Action) {
    let text = action.to_string();
    if let Err(e) = append(pool, username, role, &text).await {
        tracing::warn!(
            username = %username,
            action = %text,
            error = %e,
            "Failed to record activity"
        );
    }
}

/// Append a free-text entry, surfacing errors to the caller
pub async fn append(
    pool: &SqlitePool,
    username: &str,
    role: &str,
    action: &str,
) -> Result<ActivityLogEntry, crate::db::repository::RepoError> {
    activity_log::append(pool, username, role, action, shared::util::now_millis()).await
}
