//! Product Repository
//!
//! Every query is scoped by branch key. `current` is written from
//! [`ProductQuantities::current`] on every insert and update, never taken
//! from the caller.

use super::{RepoError, RepoResult};
use shared::models::{BranchKey, Product, ProductQuantities};
use sqlx::SqlitePool;

const SELECT_COLUMNS: &str = "SELECT id, branch, name, category, price, beg_inventory, delivered, waste, use_qty, withdrawal, current, created_at, updated_at FROM product";

/// Fields written on create and update
#[derive(Debug, Clone)]
pub struct ProductWrite<'a> {
    pub name: &'a str,
    pub category: &'a str,
    pub price: f64,
    pub quantities: ProductQuantities,
}

pub async fn find_all(pool: &SqlitePool, branch: &BranchKey) -> RepoResult<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(&format!(
        "{SELECT_COLUMNS} WHERE branch = ? ORDER BY id"
    ))
    .bind(branch.as_str())
    .fetch_all(pool)
    .await?;
    Ok(products)
}

pub async fn find_by_id(
    pool: &SqlitePool,
    branch: &BranchKey,
    id: i64,
) -> RepoResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "{SELECT_COLUMNS} WHERE id = ? AND branch = ?"
    ))
    .bind(id)
    .bind(branch.as_str())
    .fetch_optional(pool)
    .await?;
    Ok(product)
}

pub async fn create(
    pool: &SqlitePool,
    branch: &BranchKey,
    data: ProductWrite<'_>,
) -> RepoResult<Product> {
    let now = shared::util::now_millis();
    let q = data.quantities;
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO product (branch, name, category, price, beg_inventory, delivered, waste, use_qty, withdrawal, current, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(branch.as_str())
    .bind(data.name)
    .bind(data.category)
    .bind(data.price)
    .bind(q.beg_inventory)
    .bind(q.delivered)
    .bind(q.waste)
    .bind(q.use_qty)
    .bind(q.withdrawal)
    .bind(q.current())
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, branch, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

pub async fn update(
    pool: &SqlitePool,
    branch: &BranchKey,
    id: i64,
    data: ProductWrite<'_>,
) -> RepoResult<Product> {
    let now = shared::util::now_millis();
    let q = data.quantities;
    let rows = sqlx::query(
        "UPDATE product SET name = ?, category = ?, price = ?, beg_inventory = ?, delivered = ?, waste = ?, use_qty = ?, withdrawal = ?, current = ?, updated_at = ? WHERE id = ? AND branch = ?",
    )
    .bind(data.name)
    .bind(data.category)
    .bind(data.price)
    .bind(q.beg_inventory)
    .bind(q.delivered)
    .bind(q.waste)
    .bind(q.use_qty)
    .bind(q.withdrawal)
    .bind(q.current())
    .bind(now)
    .bind(id)
    .bind(branch.as_str())
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    find_by_id(pool, branch, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}

/// Delete a product, returning the removed record
pub async fn delete(pool: &SqlitePool, branch: &BranchKey, id: i64) -> RepoResult<Product> {
    let product = find_by_id(pool, branch, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))?;

    let rows = sqlx::query("DELETE FROM product WHERE id = ? AND branch = ?")
        .bind(id)
        .bind(branch.as_str())
        .execute(pool)
        .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    Ok(product)
}

/// Start the next cycle for the given `(id, current)` pairs.
///
/// Each product becomes `begInventory = current`, movements zero,
/// `current = begInventory`. All rows are written in one transaction.
/// Returns the number of rows actually modified; rows deleted in the
/// meantime simply do not count.
pub async fn rebaseline(
    pool: &SqlitePool,
    branch: &BranchKey,
    baselines: &[(i64, f64)],
) -> RepoResult<u64> {
    if baselines.is_empty() {
        return Ok(0);
    }

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;
    let mut modified = 0;

    for &(id, current) in baselines {
        let next = ProductQuantities::rebaselined(current);
        let rows = sqlx::query(
            "UPDATE product SET beg_inventory = ?, delivered = ?, waste = ?, use_qty = ?, withdrawal = ?, current = ?, updated_at = ? WHERE id = ? AND branch = ?",
        )
        .bind(next.beg_inventory)
        .bind(next.delivered)
        .bind(next.waste)
        .bind(next.use_qty)
        .bind(next.withdrawal)
        .bind(next.current())
        .bind(now)
        .bind(id)
        .bind(branch.as_str())
        .execute(&mut *tx)
        .await?;
        modified += rows.rows_affected();
    }

    tx.commit().await?;
    Ok(modified)
}

/// Product count across all branches
pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
