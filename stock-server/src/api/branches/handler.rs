//! Branch API Handlers

use axum::{Extension, extract::State};
use shared::models::Branch;

use crate::api::extract::Json;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::AppResult;

/// GET /api/branches - 当前用户可访问的已注册门店
pub async fn list(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Branch>>> {
    Ok(Json(state.branches.list_for(&current)))
}
