//! Inventory API Handlers

use axum::{Extension, extract::State};
use shared::models::SubmitResult;

use crate::api::BranchQuery;
use crate::api::extract::{Json, Query};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::inventory;
use crate::utils::AppResult;

/// POST /api/inventory/reset?branch= - 归档当前库存并开始新周期
pub async fn submit(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<BranchQuery>,
) -> AppResult<Json<SubmitResult>> {
    let branch = state.branches.resolve_for(query.branch.as_deref(), &current)?;
    let result = inventory::submit_inventory(&state.pool, &branch, &current).await?;
    Ok(Json(result))
}
