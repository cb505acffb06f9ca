//! 定时清理任务 API
//!
//! POST /api/cleanup 由定时任务调用，需要 `Authorization: Bearer <CRON_SECRET>`

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::CleanupConfig;
use crate::domain::{CleanupFailure, CleanupResponse, CleanupResult, MaintenanceOp};
use crate::error::{ApiError, ApiResult};
use crate::infra::data_store::{affected_rows, DataStore, DataStoreError};
use crate::middleware::RequireCronSecret;
use crate::state::AppState;

/// 创建清理任务路由
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/cleanup", post(run_cleanup).get(method_not_allowed))
}

/// 执行清理
///
/// POST /api/cleanup
/// 单个维护操作失败不会中断其他操作，错误汇总到 `results.errors`，仍返回 200
async fn run_cleanup(_auth: RequireCronSecret, State(state): State<Arc<AppState>>) -> Response {
    info!("Starting scheduled cleanup");

    match run_maintenance(state.data_store.as_ref(), &state.config.cleanup).await {
        Ok(results) => {
            info!(
                orphaned_images = results.orphaned_images,
                old_audit_logs = results.old_audit_logs,
                errors = results.errors.len(),
                "Cleanup finished"
            );
            (StatusCode::OK, Json(CleanupResponse::from(results))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Cleanup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(CleanupFailure::new(e.public_message())),
            )
                .into_response()
        }
    }
}

/// GET /api/cleanup
async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// 依次执行已配置的维护操作
///
/// 未配置存储过程的操作跳过，计数为 0。数据服务整体不可用时返回错误
pub async fn run_maintenance(
    store: &dyn DataStore,
    config: &CleanupConfig,
) -> ApiResult<CleanupResult> {
    let mut results = CleanupResult::default();

    for op in MaintenanceOp::ALL {
        let procedure = match procedure_for(op, config) {
            Some(name) => name,
            None => {
                debug!(operation = op.name(), "No procedure configured, skipping");
                continue;
            }
        };

        let params = match params_for(op, config) {
            Ok(params) => params,
            Err(message) => {
                warn!(operation = op.name(), "{}", message);
                results.record_error(op, message);
                continue;
            }
        };

        match store.call_procedure(procedure, params).await {
            Ok(value) => match affected_rows(&value) {
                Some(count) => results.record(op, count),
                None => {
                    warn!(operation = op.name(), result = %value, "Unexpected procedure result");
                    results.record_error(op, format!("unexpected procedure result: {}", value));
                }
            },
            Err(DataStoreError::NotConfigured) => {
                return Err(ApiError::internal(DataStoreError::NotConfigured.to_string()));
            }
            Err(e) => {
                warn!(operation = op.name(), procedure = %procedure, error = %e, "Maintenance operation failed");
                results.record_error(op, e.to_string());
            }
        }
    }

    Ok(results)
}

fn procedure_for(op: MaintenanceOp, config: &CleanupConfig) -> Option<&str> {
    match op {
        MaintenanceOp::OrphanedImages => config.orphaned_images_rpc.as_deref(),
        MaintenanceOp::OldAuditLogs => config.audit_logs_rpc.as_deref(),
    }
}

fn params_for(op: MaintenanceOp, config: &CleanupConfig) -> Result<Value, &'static str> {
    match op {
        MaintenanceOp::OrphanedImages => Ok(json!({})),
        MaintenanceOp::OldAuditLogs => config
            .audit_log_retention_days
            .map(|days| json!({ "retention_days": days }))
            .ok_or("AUDIT_LOG_RETENTION_DAYS not configured"),
    }
}
