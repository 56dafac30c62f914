//! Shared types for the stockroom server
//!
//! Wire models, the unified error system, role decomposition and branch key
//! normalization. Used by stock-server and by any Rust client of its API.

pub mod client;
pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
