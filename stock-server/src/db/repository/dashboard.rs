//! Dashboard aggregate queries

use super::RepoResult;
use shared::models::BranchProductCount;
use sqlx::SqlitePool;

/// Products whose derived stock is below zero
pub async fn count_negative_stock(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product WHERE current < 0")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Product count per registered branch, including empty branches
pub async fn products_by_branch(pool: &SqlitePool) -> RepoResult<Vec<BranchProductCount>> {
    let rows = sqlx::query_as::<_, BranchProductCount>(
        "SELECT b.key AS branch, COUNT(p.id) AS products FROM branch b LEFT JOIN product p ON p.branch = b.key GROUP BY b.key ORDER BY b.id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
