//! History API Handlers

use axum::{Extension, extract::State, http::StatusCode};
use shared::models::{BranchKey, HistoryCreate, HistoryEntry};

use crate::activity::{self, Action};
use crate::api::BranchQuery;
use crate::api::extract::{Json, Path, Query};
use crate::auth::{CurrentUser, ensure_admin};
use crate::branches::ensure_access;
use crate::core::ServerState;
use crate::db::repository::history;
use crate::utils::{AppError, AppResult, ErrorCode};

/// GET /api/history[?branch=]
///
/// 不带门店参数返回全部历史，仅限管理员。
/// 门店名称按大写匹配，与保存时的大小写无关。
pub async fn list(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<BranchQuery>,
) -> AppResult<Json<Vec<HistoryEntry>>> {
    let entries = match query.branch.as_deref() {
        None => {
            ensure_admin(&current)?;
            history::find_all(&state.pool).await?
        }
        Some(name) => {
            let key =
                BranchKey::normalize(name).ok_or_else(|| AppError::new(ErrorCode::BranchRequired))?;
            ensure_access(&current, &key)?;
            history::find_by_branch(&state.pool, name).await?
        }
    };
    Ok(Json(entries))
}

/// GET /api/history/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<HistoryEntry>> {
    let entry = history::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::HistoryNotFound).with_detail("id", id))?;

    if let Some(key) = BranchKey::normalize(&entry.branch) {
        ensure_access(&current, &key)?;
    }
    Ok(Json(entry))
}

/// POST /api/history - 手动保存快照
///
/// 门店名称按原样保存；门店必须已注册。
pub async fn create(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<HistoryCreate>,
) -> AppResult<(StatusCode, Json<HistoryEntry>)> {
    state
        .branches
        .resolve_for(Some(payload.branch.as_str()), &current)?;

    if let Some(field) = payload
        .products
        .iter()
        .find_map(|p| p.quantities.first_negative())
    {
        return Err(AppError::with_message(
            ErrorCode::ProductInvalidQuantity,
            format!("{field} must be non-negative"),
        )
        .with_detail("field", field));
    }

    let branch = payload.branch.trim();
    let date = payload.date.unwrap_or_else(shared::util::now_millis);
    let entry = history::create(
        &state.pool,
        branch,
        date,
        Some(&current.username),
        &payload.products,
    )
    .await?;

    activity::record(
        &state.pool,
        &current,
        Action::HistorySaved {
            branch: entry.branch.clone(),
            items: entry.products.len(),
        },
    )
    .await;

    Ok((StatusCode::CREATED, Json(entry)))
}
