//! User Repository

use super::{RepoError, RepoResult};
use shared::models::{Role, User};
use sqlx::SqlitePool;

/// Stored account including the password hash. Never serialized.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: i64,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            role: row.role,
            created_at: row.created_at,
        }
    }
}

const SELECT_ROW: &str = "SELECT id, username, password_hash, role, created_at FROM user_account";

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<UserRow>> {
    let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_ROW} WHERE username = ?"))
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<UserRow>> {
    let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_ROW} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        "SELECT id, username, role, created_at FROM user_account ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(users)
}

/// Insert an account. A taken username surfaces as [`RepoError::Duplicate`].
pub async fn create(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
    role: &Role,
) -> RepoResult<User> {
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO user_account (username, password_hash, role, created_at) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(username)
    .bind(password_hash)
    .bind(role.to_string())
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => RepoError::Duplicate(format!("Username '{username}' already exists")),
        other => other,
    })?;

    Ok(User {
        id,
        username: username.to_string(),
        role: role.to_string(),
        created_at: now,
    })
}

/// Fields to change on an account; `None` keeps the stored value
#[derive(Debug, Default)]
pub struct UserChanges<'a> {
    pub username: Option<&'a str>,
    pub password_hash: Option<&'a str>,
    pub role: Option<&'a Role>,
}

pub async fn update(pool: &SqlitePool, id: i64, changes: UserChanges<'_>) -> RepoResult<User> {
    let existing = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))?;

    let username = changes.username.unwrap_or(&existing.username);
    let password_hash = changes.password_hash.unwrap_or(&existing.password_hash);
    let role = changes
        .role
        .map(Role::to_string)
        .unwrap_or_else(|| existing.role.clone());

    sqlx::query("UPDATE user_account SET username = ?, password_hash = ?, role = ? WHERE id = ?")
        .bind(username)
        .bind(password_hash)
        .bind(&role)
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| match RepoError::from(e) {
            RepoError::Duplicate(_) => {
                RepoError::Duplicate(format!("Username '{username}' already exists"))
            }
            other => other,
        })?;

    Ok(User {
        id,
        username: username.to_string(),
        role,
        created_at: existing.created_at,
    })
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM user_account WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    Ok(())
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_account")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
