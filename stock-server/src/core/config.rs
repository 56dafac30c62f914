use std::path::PathBuf;

use crate::auth::JwtConfig;
use crate::utils::{AppError, ErrorCode};

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、日志) |
/// | DATABASE_URL | WORK_DIR/database/stock.db | SQLite 文件路径 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | BRANCHES | (空) | 逗号分隔的门店名称，启动时注册 |
/// | AUTH_DELAY_MS | 500 | 登录固定延迟(毫秒) |
/// | ADMIN_USERNAME / ADMIN_PASSWORD | (无) | 首次启动时创建管理员 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (无) | 日志文件目录 |
/// | JWT_SECRET / JWT_EXPIRATION_MINUTES / JWT_ISSUER / JWT_AUDIENCE | 见 [`JwtConfig`] | 令牌配置 |
///
/// # 示例
///
/// ```ignore
/// BRANCHES="North Branch,South Branch" HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    /// 显式数据库路径 (覆盖 work_dir 推导)
    pub database_path: Option<String>,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 启动时注册的门店显示名称
    pub branches: Vec<String>,
    /// 登录固定延迟 (毫秒)，防止时序攻击
    pub auth_delay_ms: u64,
    /// 初始管理员
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Result<Self, AppError> {
        let jwt = JwtConfig::from_env()
            .map_err(|e| AppError::with_message(ErrorCode::ConfigError, e.to_string()))?;

        Ok(Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            database_path: std::env::var("DATABASE_URL")
                .ok()
                .map(|url| url.trim_start_matches("sqlite:").to_string()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt,
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            branches: std::env::var("BRANCHES")
                .map(|v| parse_branch_list(&v))
                .unwrap_or_default(),
            auth_delay_ms: std::env::var("AUTH_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(500),
            admin_username: std::env::var("ADMIN_USERNAME").ok(),
            admin_password: std::env::var("ADMIN_PASSWORD").ok(),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
        })
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(
        work_dir: impl Into<String>,
        http_port: u16,
        branches: &[&str],
    ) -> Result<Self, AppError> {
        let mut config = Self::from_env()?;
        config.work_dir = work_dir.into();
        config.database_path = None;
        config.http_port = http_port;
        config.branches = branches.iter().map(|b| b.to_string()).collect();
        Ok(config)
    }

    /// SQLite 数据库文件路径
    pub fn database_file(&self) -> PathBuf {
        match &self.database_path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(&self.work_dir).join("database").join("stock.db"),
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn parse_branch_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
