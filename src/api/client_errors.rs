//! 前端错误上报 API
//!
//! POST /api/client-errors，浏览器端捕获的错误写入结构化日志

use axum::{http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use std::sync::Arc;

use crate::domain::client_error::truncate;
use crate::domain::ClientErrorReport;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// 创建错误上报路由
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/client-errors", post(report_client_error))
}

/// 接收前端错误
///
/// POST /api/client-errors
/// 无需认证
async fn report_client_error(Json(report): Json<ClientErrorReport>) -> ApiResult<impl IntoResponse> {
    if report.message.trim().is_empty() {
        return Err(ApiError::bad_request("message is required"));
    }

    tracing::warn!(
        target: "client_errors",
        error_message = %truncate(&report.message),
        url = ?report.url.as_deref(),
        user_agent = ?report.user_agent.as_deref(),
        stack = ?report.stack.as_deref().map(truncate),
        component_stack = ?report.component_stack.as_deref().map(truncate),
        "Client error reported"
    );

    Ok((
        StatusCode::ACCEPTED,
        Json(serde_json::json!({ "received": true })),
    ))
}
