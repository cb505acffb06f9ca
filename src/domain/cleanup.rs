//! 清理任务领域模型

use chrono::{DateTime, Utc};
use serde::Serialize;

/// 维护操作
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaintenanceOp {
    /// 删除不再被任何商品引用的图片记录
    OrphanedImages,
    /// 清理超过保留期的审计日志
    OldAuditLogs,
}

impl MaintenanceOp {
    /// 执行顺序
    pub const ALL: [MaintenanceOp; 2] = [MaintenanceOp::OrphanedImages, MaintenanceOp::OldAuditLogs];

    pub fn name(&self) -> &'static str {
        match self {
            MaintenanceOp::OrphanedImages => "orphaned_images",
            MaintenanceOp::OldAuditLogs => "old_audit_logs",
        }
    }
}

/// 清理结果
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupResult {
    pub orphaned_images: u64,
    pub old_audit_logs: u64,
    pub errors: Vec<String>,
}

impl CleanupResult {
    /// 记录某个操作影响的行数
    pub fn record(&mut self, op: MaintenanceOp, affected: u64) {
        match op {
            MaintenanceOp::OrphanedImages => self.orphaned_images = affected,
            MaintenanceOp::OldAuditLogs => self.old_audit_logs = affected,
        }
    }

    /// 记录某个操作的错误，不中断其他操作
    pub fn record_error(&mut self, op: MaintenanceOp, message: impl AsRef<str>) {
        self.errors.push(format!("{}: {}", op.name(), message.as_ref()));
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// POST /api/cleanup 成功响应
#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    pub success: bool,
    pub timestamp: DateTime<Utc>,
    pub results: CleanupResult,
}

impl From<CleanupResult> for CleanupResponse {
    fn from(results: CleanupResult) -> Self {
        Self {
            success: results.is_success(),
            timestamp: Utc::now(),
            results,
        }
    }
}

/// 清理任务内部失败响应
#[derive(Debug, Serialize)]
pub struct CleanupFailure {
    pub success: bool,
    pub error: String,
    pub timestamp: DateTime<Utc>,
}

impl CleanupFailure {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            timestamp: Utc::now(),
        }
    }
}
