//! User API Handlers

use axum::{Extension, extract::State, http::StatusCode};
use shared::models::{Role, User, UserCreate, UserUpdate};

use crate::activity::{self, Action};
use crate::api::extract::{Json, Path};
use crate::api::username_conflict;
use crate::auth::{CurrentUser, password};
use crate::core::ServerState;
use crate::db::repository::{RepoError, user};
use crate::db::repository::user::UserChanges;
use crate::utils::validation::{MAX_USERNAME_LEN, validate_password, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};

fn parse_role(raw: &str) -> AppResult<Role> {
    raw.parse::<Role>().map_err(|e| {
        AppError::with_message(ErrorCode::InvalidRole, e.to_string()).with_detail("role", raw)
    })
}

fn user_not_found(err: RepoError) -> AppError {
    match err {
        RepoError::NotFound(_) => AppError::new(ErrorCode::UserNotFound),
        other => username_conflict(other),
    }
}

/// GET /api/users - 用户列表
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<User>>> {
    let users = user::find_all(&state.pool).await?;
    Ok(Json(users))
}

/// GET /api/users/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<User>> {
    let row = user::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound).with_detail("id", id))?;
    Ok(Json(row.into()))
}

/// POST /api/users - 创建用户 (角色由管理员指定)
pub async fn create(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<UserCreate>,
) -> AppResult<(StatusCode, Json<User>)> {
    let username = payload.username.trim();
    validate_required_text(username, "username", MAX_USERNAME_LEN)?;
    validate_password(&payload.password)?;
    let role = parse_role(&payload.role)?;

    let hash = password::hash_password(&payload.password)?;
    let created = user::create(&state.pool, username, &hash, &role)
        .await
        .map_err(username_conflict)?;

    activity::record(
        &state.pool,
        &current,
        Action::UserCreated {
            username: created.username.clone(),
        },
    )
    .await;

    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/users/:id - 修改用户名 / 密码 / 角色
pub async fn update(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<User>> {
    let username = payload.username.as_deref().map(str::trim);
    if let Some(name) = username {
        validate_required_text(name, "username", MAX_USERNAME_LEN)?;
    }
    let role = payload.role.as_deref().map(parse_role).transpose()?;
    let password_hash = match payload.password.as_deref() {
        Some(pw) => {
            validate_password(pw)?;
            Some(password::hash_password(pw)?)
        }
        None => None,
    };

    let updated = user::update(
        &state.pool,
        id,
        UserChanges {
            username,
            password_hash: password_hash.as_deref(),
            role: role.as_ref(),
        },
    )
    .await
    .map_err(user_not_found)?;

    activity::record(
        &state.pool,
        &current,
        Action::UserUpdated {
            username: updated.username.clone(),
        },
    )
    .await;

    Ok(Json(updated))
}

/// DELETE /api/users/:id
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if id == current.id {
        return Err(AppError::new(ErrorCode::UserCannotDeleteSelf));
    }

    let existing = user::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound).with_detail("id", id))?;
    user::delete(&state.pool, id).await.map_err(user_not_found)?;

    activity::record(
        &state.pool,
        &current,
        Action::UserDeleted {
            username: existing.username,
        },
    )
    .await;

    Ok(Json(true))
}
