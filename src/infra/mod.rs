//! 基础设施模块
//!
//! 封装外部依赖（数据服务、认证服务的 HTTP client）

pub mod data_store;
pub mod identity;

use reqwest::Client;
use std::time::Duration;

pub use data_store::{DataStore, DataStoreError, RestDataStore};
pub use identity::{IdentityError, IdentityProvider, RestIdentityProvider};

/// 创建共享的 HTTP client，复用连接池
pub fn build_http_client() -> reqwest::Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .pool_max_idle_per_host(5)
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
}
