use std::sync::Arc;

use anyhow::Context;
use shared::models::Role;
use sqlx::SqlitePool;

use crate::auth::{JwtService, password};
use crate::branches::BranchRegistry;
use crate::core::{Config, Result};
use crate::db::DbService;
use crate::db::repository::user;
use crate::utils::AppError;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | pool | SqlitePool | SQLite 连接池 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | branches | Arc<BranchRegistry> | 门店注册表 (启动时构建) |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
    /// JWT 认证服务
    pub jwt_service: Arc<JwtService>,
    /// 门店注册表
    pub branches: Arc<BranchRegistry>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 数据库目录与连接池 (含迁移)
    /// 2. 门店注册表 (配置中的门店写入 branch 表后整体加载)
    /// 3. 初始管理员 (ADMIN_USERNAME / ADMIN_PASSWORD)
    /// 4. JWT 服务
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db_file = config.database_file();
        if let Some(parent) = db_file.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory {}", parent.display())
            })?;
        }

        let db = DbService::new(&db_file.to_string_lossy()).await?;

        let branches = BranchRegistry::load(&db.pool, &config.branches)
            .await
            .map_err(AppError::from)?;
        tracing::info!(count = branches.len(), "Branch registry loaded");

        seed_admin(&db.pool, config).await?;

        Ok(Self {
            config: config.clone(),
            pool: db.pool,
            jwt_service: Arc::new(JwtService::with_config(config.jwt.clone())),
            branches: Arc::new(branches),
        })
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}

/// Create the configured admin account unless the username is already taken.
async fn seed_admin(pool: &SqlitePool, config: &Config) -> Result<()> {
    let (Some(username), Some(pw)) = (&config.admin_username, &config.admin_password) else {
        return Ok(());
    };

    if user::find_by_username(pool, username)
        .await
        .map_err(AppError::from)?
        .is_some()
    {
        return Ok(());
    }

    let hash = password::hash_password(pw)?;
    user::create(pool, username, &hash, &Role::admin())
        .await
        .map_err(AppError::from)?;
    tracing::info!(username = %username, "Seeded admin account");
    Ok(())
}
