//! Stock Server - 多门店库存跟踪服务
//!
//! # 架构概述
//!
//! - **产品** (`db/repository/product`): 每个门店独立的产品库存表，`current` 由服务端推导
//! - **历史** (`db/repository/history`): 只追加的库存快照
//! - **库存流程** (`inventory`): 提交 = 归档快照 + 重置基线
//! - **认证** (`auth`): JWT + Argon2，角色拆分为 (权限级别, 门店范围)
//! - **门店注册表** (`branches`): 规范化门店键 → 存储句柄
//! - **操作日志** (`activity`): 只追加的用户操作审计
//!
//! # 模块结构
//!
//! ```text
//! stock-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、密码、中间件
//! ├── branches/      # 门店注册表
//! ├── inventory/     # 字段门控、提交流程
//! ├── activity/      # 操作日志记录
//! ├── api/           # HTTP 路由和处理器
//! ├── utils/         # 日志、校验
//! └── db/            # SQLite 连接池与仓储
//! ```

pub mod activity;
pub mod api;
pub mod auth;
pub mod branches;
pub mod core;
pub mod db;
pub mod inventory;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use crate::core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
