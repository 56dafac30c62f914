//! Activity Log API Handlers

use axum::{Extension, extract::State, http::StatusCode};
use shared::models::{ActivityLogCleared, ActivityLogCreate, ActivityLogEntry};

use crate::activity;
use crate::api::extract::Json;
use crate::auth::{CurrentUser, ensure_admin};
use crate::core::ServerState;
use crate::db::repository::activity_log;
use crate::security_log;
use crate::utils::AppResult;
use crate::utils::validation::{MAX_NOTE_LEN, validate_required_text};

/// GET /api/activity-log - 最新的在前
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<ActivityLogEntry>>> {
    let entries = activity_log::find_all(&state.pool).await?;
    Ok(Json(entries))
}

/// POST /api/activity-log
///
/// 用户名与角色取自令牌，请求体只提供 `action`。
pub async fn append(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<ActivityLogCreate>,
) -> AppResult<(StatusCode, Json<ActivityLogEntry>)> {
    let action = payload.action.trim();
    validate_required_text(action, "action", MAX_NOTE_LEN)?;

    let entry = activity::append(
        &state.pool,
        &current.username,
        &current.role.to_string(),
        action,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// DELETE /api/activity-log - 清空日志 (不可恢复)
pub async fn clear(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<ActivityLogCleared>> {
    ensure_admin(&current)?;

    let removed = activity_log::clear(&state.pool).await?;
    security_log!(
        "INFO",
        "activity_log_cleared",
        user_id = current.id,
        username = current.username.clone(),
        removed = removed
    );
    Ok(Json(ActivityLogCleared { removed }))
}
