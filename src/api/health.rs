//! 健康检查 API
//!
//! 包含 /api/health 端点（/health 为别名）

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use std::sync::Arc;

use crate::domain::HealthResult;
use crate::error::{ApiError, ApiResult};
use crate::infra::DataStoreError;
use crate::state::AppState;

/// 创建健康检查路由
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/health", get(health_check))
}

/// 健康检查
///
/// GET /api/health
/// 无需认证。正常返回 200，任一检查失败返回 503
async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResult>) {
    match check(&state).await {
        Ok(result) => (StatusCode::OK, Json(result)),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResult::unhealthy(e.public_message())),
            )
        }
    }
}

/// 执行健康检查
///
/// 1. 对数据服务做一次 limit 1 的查询
/// 2. 检查必需配置项是否齐全
///
/// 数据服务地址缺失时不报查询错误，统一报告缺失的配置项
pub async fn check(state: &AppState) -> ApiResult<HealthResult> {
    let missing = state.config.missing_required();

    match state
        .data_store
        .select_limit(&state.config.health_check_table, 1)
        .await
    {
        Ok(_) => {}
        // 未配置地址时由下面的配置检查给出缺失项
        Err(DataStoreError::NotConfigured) if !missing.is_empty() => {}
        Err(e) => return Err(ApiError::dependency(e.to_string())),
    }

    if !missing.is_empty() {
        return Err(ApiError::config(format!(
            "Missing environment variables: {}",
            missing.join(", ")
        )));
    }

    Ok(HealthResult::healthy(
        &state.config.environment,
        state.config.version_or_unknown(),
    ))
}
