//! 认证中间件
//!
//! - `RequireUser`: 页面级登录门禁，未登录时重定向到登录页
//! - `RequireCronSecret`: 定时任务的 Bearer 密钥校验

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{
        header::{AUTHORIZATION, COOKIE},
        request::Parts,
        HeaderMap,
    },
    response::Redirect,
};
use std::sync::Arc;

use crate::domain::{AuthGate, User};
use crate::error::ApiError;
use crate::state::AppState;

/// 登录门禁 Extractor
///
/// 未登录时直接返回 303 重定向，handler 不会执行。
/// 登录页会带上当前路径作为返回地址。
///
/// # Example
///
/// ```ignore
/// async fn protected_page(RequireUser(user): RequireUser) -> impl IntoResponse {
///     // handler 逻辑...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for RequireUser {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let return_to = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| parts.uri.path());
        let gate = AuthGate::returning_to(return_to);
        require_user(state, &parts.headers, &gate).await.map(RequireUser)
    }
}

/// 要求当前请求已登录
///
/// 返回当前用户；否则返回指向 `gate` 目标地址的重定向
pub async fn require_user(
    state: &AppState,
    headers: &HeaderMap,
    gate: &AuthGate,
) -> Result<User, Redirect> {
    let user = current_user(state, headers).await;
    gate.resolve(user).map_err(|target| Redirect::to(&target))
}

/// 查询当前用户
///
/// 没有会话 token，或认证服务查询失败时返回 `None`
pub async fn current_user(state: &AppState, headers: &HeaderMap) -> Option<User> {
    let token = session_token(headers, &state.config.session_cookie)?;

    match state.identity.current_user(&token).await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(error = %e, "Identity lookup failed, treating request as signed out");
            None
        }
    }
}

/// 提取会话 access token
///
/// 优先读取 `Authorization: Bearer`，其次读取会话 cookie
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    if let Some(token) = bearer_token(headers) {
        return Some(token.to_string());
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
}

/// 定时任务密钥 Extractor
///
/// 未配置 `CRON_SECRET` 时返回 500（部署配置错误），
/// `Authorization` 不等于 `Bearer <secret>` 时返回 401
#[derive(Debug, Clone)]
pub struct RequireCronSecret;

#[async_trait]
impl FromRequestParts<Arc<AppState>> for RequireCronSecret {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        verify_cron_secret(&parts.headers, state.config.cron_secret.as_deref())
    }
}

/// 验证定时任务密钥
pub fn verify_cron_secret(
    headers: &HeaderMap,
    expected_secret: Option<&str>,
) -> Result<RequireCronSecret, ApiError> {
    let secret = match expected_secret {
        Some(secret) => secret,
        None => {
            tracing::error!("CRON_SECRET is not configured");
            return Err(ApiError::config("CRON_SECRET not configured"));
        }
    };

    let provided = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    let expected = format!("Bearer {}", secret);

    match provided {
        Some(value) if value == expected => Ok(RequireCronSecret),
        Some(_) => {
            tracing::warn!("Invalid cron authorization provided");
            Err(ApiError::unauthorized())
        }
        None => {
            tracing::warn!("Missing authorization header");
            Err(ApiError::unauthorized())
        }
    }
}
