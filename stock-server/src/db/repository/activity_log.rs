//! Activity Log Repository

use super::RepoResult;
use shared::models::ActivityLogEntry;
use sqlx::SqlitePool;

pub async fn append(
    pool: &SqlitePool,
    username: &str,
    role: &str,
    action: &str,
    timestamp: i64,
) -> RepoResult<ActivityLogEntry> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO activity_log (username, role, action, timestamp) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(username)
    .bind(role)
    .bind(action)
    .bind(timestamp)
    .fetch_one(pool)
    .await?;

    Ok(ActivityLogEntry {
        id,
        username: username.to_string(),
        role: role.to_string(),
        action: action.to_string(),
        timestamp,
    })
}

/// Newest first; entries sharing a timestamp keep insertion order reversed
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<ActivityLogEntry>> {
    let entries = sqlx::query_as::<_, ActivityLogEntry>(
        "SELECT id, username, role, action, timestamp FROM activity_log ORDER BY timestamp DESC, id DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(entries)
}

/// Remove every entry, returning how many were removed
pub async fn clear(pool: &SqlitePool) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM activity_log").execute(pool).await?;
    Ok(rows.rows_affected())
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM activity_log")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
