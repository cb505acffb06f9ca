//! 领域模型模块
//!
//! 纯数据结构，不依赖 axum/tokio

pub mod cleanup;
pub mod client_error;
pub mod gate;
pub mod health;
pub mod user;

// Re-exports for convenience
pub use cleanup::{CleanupFailure, CleanupResponse, CleanupResult, MaintenanceOp};
pub use client_error::ClientErrorReport;
pub use gate::{AuthGate, GateAction, GateState, DEFAULT_SIGN_IN_PATH};
pub use health::{HealthResult, HealthStatus};
pub use user::User;
