//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 登录、注册、当前用户
//! - [`users`] - 用户管理 (管理员)
//! - [`branches`] - 门店列表
//! - [`products`] - 门店商品
//! - [`inventory`] - 库存提交 / 重置
//! - [`history`] - 库存历史快照
//! - [`activity_log`] - 操作日志
//! - [`dashboard`] - 汇总统计
//! - [`extract`] - Json / Path / Query 提取器 (拒绝转为 JSON 错误)

pub mod activity_log;
pub mod auth;
pub mod branches;
pub mod dashboard;
pub mod extract;
pub mod health;
pub mod history;
pub mod inventory;
pub mod products;
pub mod users;

use axum::Router;

use crate::core::ServerState;
use crate::db::repository::RepoError;
use crate::utils::{AppError, ErrorCode};

pub use crate::utils::AppResult;

/// Query string carrying the branch display name
#[derive(Debug, Default, serde::Deserialize)]
pub struct BranchQuery {
    pub branch: Option<String>,
}

/// 所有 API 路由 (认证中间件由 [`crate::core::build_router`] 统一挂载)
pub fn routes() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(users::router())
        .merge(branches::router())
        .merge(products::router())
        .merge(inventory::router())
        .merge(history::router())
        .merge(activity_log::router())
        .merge(dashboard::router())
}

/// Map a duplicate-key insert on `user_account` to 409 UsernameExists.
/// The driver message stays in the log.
pub(crate) fn username_conflict(err: RepoError) -> AppError {
    match err {
        RepoError::Duplicate(msg) => {
            tracing::info!(reason = %msg, "Username conflict");
            AppError::new(ErrorCode::UsernameExists)
        }
        other => other.into(),
    }
}
