//! 库存提交流程
//!
//! 提交 = 归档快照 + 重置基线：
//!
//! 1. 读取门店全部商品
//! 2. 写入一条历史快照 (重置前的值)；失败则整体中止，商品不变
//! 3. 以快照中的 `current` 作为新的 `begInventory`，其余字段清零
//! 4. 记录操作日志
//!
//! 同一门店的提交通过 [`BranchHandle::submit_lock`] 串行执行。

use shared::models::{ProductSnapshot, SubmitResult};
use sqlx::SqlitePool;

use crate::activity::{self, Action};
use crate::auth::CurrentUser;
use crate::branches::BranchHandle;
use crate::db::repository::{history, product};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Archive and re-baseline every product of `branch`.
pub async fn submit_inventory(
    pool: &SqlitePool,
    branch: &BranchHandle,
    actor: &CurrentUser,
) -> AppResult<SubmitResult> {
    let _guard = branch.submit_lock.lock().await;

    let products = product::find_all(pool, &branch.key).await?;
    let snapshots: Vec<ProductSnapshot> = products.iter().map(ProductSnapshot::from).collect();

    let entry = history::create(
        pool,
        &branch.name,
        shared::util::now_millis(),
        Some(&actor.username),
        &snapshots,
    )
    .await
    .map_err(|e| {
        tracing::error!(branch = %branch.key, error = %e, "History archive failed, inventory left unchanged");
        AppError::new(ErrorCode::HistoryArchiveFailed).with_detail("branch", branch.name.clone())
    })?;

    let baselines: Vec<(i64, f64)> = products.iter().map(|p| (p.id, p.current)).collect();
    let modified = product::rebaseline(pool, &branch.key, &baselines)
        .await
        .map_err(|e| AppError::from(e).with_detail("historyId", entry.id))?;

    if modified < baselines.len() as u64 {
        tracing::warn!(
            branch = %branch.key,
            archived = snapshots.len(),
            modified,
            "Some products changed during submission and were not re-baselined"
        );
    }

    tracing::info!(
        branch = %branch.key,
        history_id = entry.id,
        archived = snapshots.len(),
        modified,
        "Inventory submitted"
    );

    activity::record(
        pool,
        actor,
        Action::InventorySubmitted {
            branch: branch.name.clone(),
            items: snapshots.len(),
        },
    )
    .await;

    Ok(SubmitResult {
        history_id: entry.id,
        branch: branch.name.clone(),
        archived: snapshots.len(),
        modified,
    })
}
