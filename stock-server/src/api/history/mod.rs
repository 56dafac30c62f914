//! History API 模块
//!
//! | 路径 | 方法 | 说明 | 权限 |
//! |------|------|------|------|
//! | /api/history | GET | 全部历史 | 管理员 |
//! | /api/history?branch= | GET | 门店历史 (名称不区分大小写) | 门店范围 |
//! | /api/history/{id} | GET | 单条历史 | 门店范围 |
//! | /api/history | POST | 手动保存快照 | 门店范围 |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/history", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id))
}
