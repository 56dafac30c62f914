//! Dashboard API Handlers

use axum::{Extension, extract::State};
use shared::models::{BranchKey, DashboardStats};

use crate::api::extract::Json;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{activity_log, dashboard, history, product, user};
use crate::utils::AppResult;

/// GET /api/dashboard - 汇总统计
///
/// 全局计数对所有登录用户可见，按门店的商品数只包含当前用户可访问的门店。
pub async fn stats(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<DashboardStats>> {
    let pool = &state.pool;

    let products_by_branch = dashboard::products_by_branch(pool)
        .await?
        .into_iter()
        .filter(|row| {
            BranchKey::normalize(&row.branch)
                .map(|key| current.can_access(&key))
                .unwrap_or(false)
        })
        .collect();

    Ok(Json(DashboardStats {
        users: user::count(pool).await?,
        branches: state.branches.len() as i64,
        products: product::count(pool).await?,
        history_entries: history::count(pool).await?,
        activity_entries: activity_log::count(pool).await?,
        negative_stock: dashboard::count_negative_stock(pool).await?,
        products_by_branch,
    }))
}
