//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`clients`] - 会员增删改查

pub mod clients;
pub mod health;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
