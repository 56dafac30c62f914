//! Authentication Handlers
//!
//! Handles login, registration and the current profile

use std::time::Duration;

use axum::{Extension, extract::State, http::StatusCode};
use shared::client::{LoginRequest, LoginResponse, RegisterRequest, UserInfo};
use shared::models::{Role, User};

use crate::activity::{self, Action};
use crate::auth::{CurrentUser, password};
use crate::api::extract::Json;
use crate::api::username_conflict;
use crate::core::ServerState;
use crate::db::repository::user;
use crate::security_log;
use crate::utils::validation::{MAX_USERNAME_LEN, validate_password, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};

fn user_info(id: i64, username: String, role: &Role) -> UserInfo {
    UserInfo {
        id,
        username,
        role: role.to_string(),
        branch: role.branch().map(str::to_string),
    }
}

/// Login handler
///
/// Authenticates user credentials and returns a JWT token
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let username = req.username.trim().to_string();
    let account = user::find_by_username(&state.pool, &username).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(state.config.auth_delay_ms)).await;

    // Unified error message to prevent username enumeration
    let account = match account {
        Some(a) if password::verify_password(&req.password, &a.password_hash) => a,
        Some(_) => {
            security_log!(
                "WARN",
                "login_failed",
                username = username.clone(),
                reason = "invalid_password"
            );
            return Err(AppError::invalid_credentials());
        }
        None => {
            security_log!(
                "WARN",
                "login_failed",
                username = username.clone(),
                reason = "user_not_found"
            );
            return Err(AppError::invalid_credentials());
        }
    };

    let role: Role = account.role.parse().map_err(|e| {
        AppError::internal(format!("Stored role for {} is invalid: {}", account.username, e))
    })?;

    let token = state
        .get_jwt_service()
        .generate_token(account.id, &account.username, &role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    activity::record_as(&state.pool, &account.username, &account.role, Action::Login).await;

    tracing::info!(
        user_id = account.id,
        username = %account.username,
        role = %role,
        "User logged in successfully"
    );

    Ok(Json(LoginResponse {
        token,
        user: user_info(account.id, account.username, &role),
    }))
}

/// Self-registration. Whatever role the client asks for, the account is a `User`.
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    let username = req.username.trim();
    validate_required_text(username, "username", MAX_USERNAME_LEN)?;
    validate_password(&req.password)?;

    if let Some(requested) = req.role.as_deref().filter(|r| !r.trim().eq_ignore_ascii_case("user")) {
        security_log!(
            "WARN",
            "register_role_ignored",
            username = username.to_string(),
            requested = requested.to_string()
        );
    }

    let hash = password::hash_password(&req.password)?;
    let role = Role::user();
    let created = user::create(&state.pool, username, &hash, &role)
        .await
        .map_err(username_conflict)?;

    activity::record_as(&state.pool, &created.username, &created.role, Action::Register).await;
    tracing::info!(user_id = created.id, username = %created.username, "User registered");

    Ok((StatusCode::CREATED, Json(created)))
}

/// Get current user info
pub async fn me(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> AppResult<Json<UserInfo>> {
    // Fresh read: the account may have been renamed or deleted since the token was issued
    let account = user::find_by_id(&state.pool, current.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    let role: Role = account
        .role
        .parse()
        .map_err(|e| AppError::internal(format!("Stored role is invalid: {}", e)))?;

    Ok(Json(user_info(account.id, account.username, &role)))
}

/// Logout handler
///
/// Tokens are stateless; this only records the activity.
pub async fn logout(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<()>> {
    activity::record(&state.pool, &current, Action::Logout).await;
    tracing::info!(user_id = current.id, username = %current.username, "User logged out");
    Ok(Json(()))
}
