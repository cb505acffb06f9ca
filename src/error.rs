//! 统一错误处理
//!
//! handler 的核心逻辑返回带标签的 `ApiError`，在 HTTP 边界统一转换为状态码，
//! 不依赖错误消息字符串区分失败原因

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// API 错误响应结构
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// 统一 API 错误类型
#[derive(Debug, Error)]
pub enum ApiError {
    /// 500 - 部署配置缺失（密钥或环境变量未设置），不重试
    #[error("{0}")]
    Config(String),
    /// 401 - 凭据不匹配
    #[error("Unauthorized")]
    Unauthorized,
    /// 外部数据服务失败（health 返回 503，其余返回 500）
    #[error("{0}")]
    Dependency(String),
    /// 400 - 请求无效
    #[error("{0}")]
    BadRequest(String),
    /// 405
    #[error("Method not allowed")]
    MethodNotAllowed,
    /// 500 - 内部错误
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn unauthorized() -> Self {
        Self::Unauthorized
    }

    pub fn dependency(message: impl Into<String>) -> Self {
        Self::Dependency(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// 对外暴露的错误消息，空消息回退为 "Unknown error"
    pub fn public_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            "Unknown error".to_string()
        } else {
            message
        }
    }

    /// 默认的状态码映射
    ///
    /// health 端点自行把 `Dependency` / `Config` 映射为 503
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Dependency(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::new(self.public_message());
        (status, Json(body)).into_response()
    }
}

/// 便捷类型别名
pub type ApiResult<T> = Result<T, ApiError>;
