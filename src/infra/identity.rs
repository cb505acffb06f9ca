//! 认证服务 HTTP Client
//!
//! 根据会话 access token 查询当前用户

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::domain::User;

/// 认证服务错误类型
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Identity service URL is not configured")]
    NotConfigured,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Identity service returned {0}")]
    Status(u16),
}

/// 认证服务
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// 查询 token 对应的当前用户，token 无效时返回 `None`
    async fn current_user(&self, access_token: &str) -> Result<Option<User>, IdentityError>;
}

/// 基于 REST 的认证服务客户端
#[derive(Clone)]
pub struct RestIdentityProvider {
    client: Client,
    base_url: Option<String>,
    anon_key: Option<String>,
}

impl RestIdentityProvider {
    pub fn new(client: Client, base_url: Option<String>, anon_key: Option<String>) -> Self {
        Self {
            client,
            base_url,
            anon_key,
        }
    }
}

#[async_trait]
impl IdentityProvider for RestIdentityProvider {
    async fn current_user(&self, access_token: &str) -> Result<Option<User>, IdentityError> {
        let base = self.base_url.as_deref().ok_or(IdentityError::NotConfigured)?;
        let url = format!("{}/auth/v1/user", base);

        let mut request = self.client.get(&url).bearer_auth(access_token);
        if let Some(key) = &self.anon_key {
            request = request.header("apikey", key);
        }

        let response = request.send().await?;
        match response.status() {
            status if status.is_success() => Ok(Some(response.json::<User>().await?)),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            status => Err(IdentityError::Status(status.as_u16())),
        }
    }
}
