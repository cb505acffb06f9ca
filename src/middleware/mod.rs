//! 中间件模块

pub mod auth;

pub use auth::{require_user, RequireCronSecret, RequireUser};
