//! 库存业务规则
//!
//! - [`edit`]: 商品字段门控与校验
//! - [`workflow`]: 提交 (归档 + 重置基线)

pub mod edit;
pub mod workflow;

pub use edit::{ProductFields, gate_quantities, prepare_create, prepare_update, warn_if_overdrawn};
pub use workflow::submit_inventory;
