//! 应用状态

use std::sync::Arc;

use crate::config::EnvConfig;
use crate::infra::{build_http_client, DataStore, IdentityProvider, RestDataStore, RestIdentityProvider};

/// 应用状态
///
/// 进程生命周期内只读，请求之间不共享可变状态
pub struct AppState {
    /// 环境配置快照
    pub config: EnvConfig,
    /// 数据服务
    pub data_store: Arc<dyn DataStore>,
    /// 认证服务
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    /// 使用指定的外部服务创建应用状态
    pub fn new(
        config: EnvConfig,
        data_store: Arc<dyn DataStore>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            config,
            data_store,
            identity,
        }
    }

    /// 根据配置创建 REST 客户端并组装应用状态
    pub fn from_config(config: EnvConfig) -> anyhow::Result<Self> {
        tracing::info!(
            environment = %config.environment,
            version = %config.version_or_unknown(),
            data_url = ?config.public_data_url,
            anon_key_set = config.public_data_anon_key.is_some(),
            service_role_key_set = config.service_role_key.is_some(),
            cron_secret_set = config.cron_secret.is_some(),
            port = config.port,
            "Loaded configuration"
        );

        let client = build_http_client()?;

        // 维护操作需要绕过行级权限，优先使用 service role key
        let data_key = config
            .service_role_key
            .clone()
            .or_else(|| config.public_data_anon_key.clone());
        let data_store = RestDataStore::new(client.clone(), config.public_data_url.clone(), data_key);
        let identity = RestIdentityProvider::new(
            client,
            config.public_data_url.clone(),
            config.public_data_anon_key.clone(),
        );

        Ok(Self::new(config, Arc::new(data_store), Arc::new(identity)))
    }
}
