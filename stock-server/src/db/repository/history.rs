//! History Repository
//!
//! `history` holds one row per snapshot, `history_product` the archived
//! product lines in their original order.

use std::collections::HashMap;

use super::RepoResult;
use shared::models::{HistoryEntry, ProductSnapshot, history_key};
use sqlx::SqlitePool;

const SELECT_ENTRY: &str = "SELECT id, branch, date, submitted_by FROM history";

#[derive(sqlx::FromRow)]
struct HistoryProductRow {
    history_id: i64,
    #[sqlx(flatten)]
    snapshot: ProductSnapshot,
}

/// Insert a snapshot and all of its product lines in one transaction.
///
/// `branch` is stored exactly as given; the upper-cased form is kept
/// alongside it for lookups.
pub async fn create(
    pool: &SqlitePool,
    branch: &str,
    date: i64,
    submitted_by: Option<&str>,
    products: &[ProductSnapshot],
) -> RepoResult<HistoryEntry> {
    let mut tx = pool.begin().await?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO history (branch, branch_key, date, submitted_by) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(branch)
    .bind(history_key(branch))
    .bind(date)
    .bind(submitted_by)
    .fetch_one(&mut *tx)
    .await?;

    for (position, p) in products.iter().enumerate() {
        let q = &p.quantities;
        sqlx::query(
            "INSERT INTO history_product (history_id, position, name, category, price, beg_inventory, delivered, waste, use_qty, withdrawal, current) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(position as i64)
        .bind(&p.name)
        .bind(&p.category)
        .bind(p.price)
        .bind(q.beg_inventory)
        .bind(q.delivered)
        .bind(q.waste)
        .bind(q.use_qty)
        .bind(q.withdrawal)
        .bind(p.current)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(HistoryEntry {
        id,
        branch: branch.to_string(),
        date,
        submitted_by: submitted_by.map(str::to_string),
        products: products.to_vec(),
    })
}

/// All snapshots, newest first
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<HistoryEntry>> {
    let entries = sqlx::query_as::<_, HistoryEntry>(&format!(
        "{SELECT_ENTRY} ORDER BY date DESC, id DESC"
    ))
    .fetch_all(pool)
    .await?;
    with_products(pool, entries).await
}

/// Snapshots for one branch, matched case-insensitively, newest first
pub async fn find_by_branch(pool: &SqlitePool, branch: &str) -> RepoResult<Vec<HistoryEntry>> {
    let entries = sqlx::query_as::<_, HistoryEntry>(&format!(
        "{SELECT_ENTRY} WHERE branch_key = ? ORDER BY date DESC, id DESC"
    ))
    .bind(history_key(branch))
    .fetch_all(pool)
    .await?;
    with_products(pool, entries).await
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<HistoryEntry>> {
    let entry = sqlx::query_as::<_, HistoryEntry>(&format!("{SELECT_ENTRY} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    match entry {
        Some(entry) => Ok(with_products(pool, vec![entry]).await?.pop()),
        None => Ok(None),
    }
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM history")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Attach product lines to the entries with a single query
async fn with_products(
    pool: &SqlitePool,
    mut entries: Vec<HistoryEntry>,
) -> RepoResult<Vec<HistoryEntry>> {
    if entries.is_empty() {
        return Ok(entries);
    }

    let placeholders = vec!["?"; entries.len()].join(", ");
    let sql = format!(
        "SELECT history_id, name, category, price, beg_inventory, delivered, waste, use_qty, withdrawal, current FROM history_product WHERE history_id IN ({placeholders}) ORDER BY history_id, position"
    );
    let mut query = sqlx::query_as::<_, HistoryProductRow>(&sql);
    for entry in &entries {
        query = query.bind(entry.id);
    }
    let rows = query.fetch_all(pool).await?;

    let mut grouped: HashMap<i64, Vec<ProductSnapshot>> = HashMap::new();
    for row in rows {
        grouped.entry(row.history_id).or_default().push(row.snapshot);
    }

    for entry in &mut entries {
        entry.products = grouped.remove(&entry.id).unwrap_or_default();
    }
    Ok(entries)
}
