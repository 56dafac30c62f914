//! Activity Log API 模块
//!
//! 清空 (DELETE) 仅限管理员，在处理器内校验。

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/api/activity-log",
        get(handler::list)
            .post(handler::append)
            .delete(handler::clear),
    )
}
