//! 门店注册表
//!
//! 启动时把配置中的门店写入 `branch` 表，然后整体加载到内存。
//! 请求中的门店名称统一经过 [`BranchRegistry::resolve`] 规范化，
//! 未注册的门店直接拒绝，不会隐式创建新的商品集合。
//!
//! 每个门店持有一把提交锁，保证同一门店的库存提交串行执行。

use std::sync::Arc;

use dashmap::DashMap;
use shared::models::{Branch, BranchKey};
use sqlx::SqlitePool;
use tokio::sync::Mutex;

use crate::auth::CurrentUser;
use crate::db::repository::{RepoResult, branch};
use crate::security_log;
use crate::utils::{AppError, AppResult, ErrorCode};

/// 已注册门店
#[derive(Debug)]
pub struct BranchHandle {
    pub id: i64,
    pub key: BranchKey,
    /// 显示名称
    pub name: String,
    /// 库存提交锁 (同一门店同一时间只允许一次提交)
    pub submit_lock: Mutex<()>,
}

impl BranchHandle {
    fn from_record(record: Branch) -> Option<Self> {
        let key = BranchKey::normalize(&record.key)?;
        Some(Self {
            id: record.id,
            key,
            name: record.name,
            submit_lock: Mutex::new(()),
        })
    }
}

/// 门店注册表 (key -> handle)
#[derive(Debug, Default)]
pub struct BranchRegistry {
    branches: DashMap<BranchKey, Arc<BranchHandle>>,
    /// 保留注册顺序与创建时间，用于列表输出
    records: Vec<Branch>,
}

impl BranchRegistry {
    /// 写入配置中的门店并加载全部已注册门店
    pub async fn load(pool: &SqlitePool, names: &[String]) -> RepoResult<Self> {
        for name in names {
            match BranchKey::normalize(name) {
                Some(key) => branch::ensure(pool, &key, name.trim()).await?,
                None => tracing::warn!(name = %name, "Skipping blank branch name"),
            }
        }

        let records = branch::find_all(pool).await?;
        let branches = DashMap::new();
        for record in &records {
            if let Some(handle) = BranchHandle::from_record(record.clone()) {
                branches.insert(handle.key.clone(), Arc::new(handle));
            }
        }

        Ok(Self { branches, records })
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// 已注册门店，按注册顺序
    pub fn list(&self) -> Vec<Branch> {
        self.records.clone()
    }

    /// 仅返回当前用户可访问的门店
    pub fn list_for(&self, user: &CurrentUser) -> Vec<Branch> {
        self.records
            .iter()
            .filter(|b| {
                BranchKey::normalize(&b.key)
                    .map(|key| user.can_access(&key))
                    .unwrap_or(false)
            })
            .cloned()
            .collect()
    }

    /// 规范化门店名称并查找注册表
    ///
    /// # 错误
    ///
    /// | 情况 | 错误码 |
    /// |------|--------|
    /// | 名称为空 | 400 BranchRequired |
    /// | 未注册 | 404 BranchNotFound |
    pub fn resolve(&self, name: Option<&str>) -> AppResult<Arc<BranchHandle>> {
        let key = name
            .and_then(BranchKey::normalize)
            .ok_or_else(|| AppError::new(ErrorCode::BranchRequired))?;

        self.branches
            .get(&key)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| {
                AppError::new(ErrorCode::BranchNotFound).with_detail("branch", key.to_string())
            })
    }

    /// 查找门店并校验当前用户的门店范围
    ///
    /// 门店受限角色访问其他门店返回 403 BranchAccessDenied。
    pub fn resolve_for(
        &self,
        name: Option<&str>,
        user: &CurrentUser,
    ) -> AppResult<Arc<BranchHandle>> {
        let handle = self.resolve(name)?;
        ensure_access(user, &handle.key)?;
        Ok(handle)
    }
}

/// 校验用户是否可访问指定门店
pub fn ensure_access(user: &CurrentUser, key: &BranchKey) -> AppResult<()> {
    if user.can_access(key) {
        return Ok(());
    }

    security_log!(
        "WARN",
        "branch_access_denied",
        user_id = user.id,
        username = user.username.clone(),
        user_role = user.role.to_string(),
        branch = key.to_string()
    );
    Err(AppError::new(ErrorCode::BranchAccessDenied).with_detail("branch", key.to_string()))
}
