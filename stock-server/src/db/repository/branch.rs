//! Branch Repository

use super::RepoResult;
use shared::models::{Branch, BranchKey};
use sqlx::SqlitePool;

/// Register a branch. An existing key is left untouched.
pub async fn ensure(pool: &SqlitePool, key: &BranchKey, name: &str) -> RepoResult<()> {
    sqlx::query("INSERT OR IGNORE INTO branch (key, name, created_at) VALUES (?, ?, ?)")
        .bind(key.as_str())
        .bind(name)
        .bind(shared::util::now_millis())
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Branch>> {
    let branches =
        sqlx::query_as::<_, Branch>("SELECT id, key, name, created_at FROM branch ORDER BY id")
            .fetch_all(pool)
            .await?;
    Ok(branches)
}
