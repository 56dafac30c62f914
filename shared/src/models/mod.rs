//! Data models
//!
//! Shared between stock-server and its clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod activity_log;
pub mod branch;
pub mod dashboard;
pub mod history;
pub mod product;
pub mod role;
pub mod serde_helpers;
pub mod user;

// Re-exports
pub use activity_log::*;
pub use branch::*;
pub use dashboard::*;
pub use history::*;
pub use product::*;
pub use role::*;
pub use user::*;
