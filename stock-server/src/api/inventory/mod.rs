//! Inventory API 模块 (提交 / 重置)

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/inventory/reset", post(handler::submit))
}
