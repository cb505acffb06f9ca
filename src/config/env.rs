//! 环境变量配置加载
//!
//! 进程启动时读取一次，之后作为只读快照注入每个 handler

use std::env;
use tracing::warn;

/// 健康检查要求必须存在的配置项（顺序即报错时的列出顺序）
pub const REQUIRED_ENV_VARS: [&str; 3] = ["PUBLIC_DATA_URL", "PUBLIC_DATA_ANON_KEY", "SERVICE_ROLE_KEY"];

/// 环境配置
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// 定时清理任务的 Bearer 密钥
    pub cron_secret: Option<String>,
    /// 数据/认证服务地址
    pub public_data_url: Option<String>,
    /// 匿名访问 key
    pub public_data_anon_key: Option<String>,
    /// service role key（服务端维护操作使用）
    pub service_role_key: Option<String>,
    /// 运行环境名称
    pub environment: String,
    /// 版本号（可选）
    pub version: Option<String>,
    /// 监听地址
    pub bind_addr: String,
    /// 服务监听端口
    pub port: u16,
    /// 健康检查读取的表
    pub health_check_table: String,
    /// 保存 access token 的 cookie 名称
    pub session_cookie: String,
    /// 清理任务配置
    pub cleanup: CleanupConfig,
}

/// 清理任务配置
///
/// 存储过程名称与保留天数都由部署方提供，未配置的操作会被跳过
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CleanupConfig {
    /// 删除孤立图片的存储过程
    pub orphaned_images_rpc: Option<String>,
    /// 清理旧审计日志的存储过程
    pub audit_logs_rpc: Option<String>,
    /// 审计日志保留天数，作为参数传给存储过程
    pub audit_log_retention_days: Option<u32>,
}

impl EnvConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        if env::var("NODE_ENV").is_ok() && env::var("APP_ENV").is_err() {
            warn!("NODE_ENV is ignored. Please use APP_ENV to name the environment");
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 从任意 key -> value 查找函数构建配置，空字符串视为未设置
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = load_with_fallback(&get, "APP_ENV", "ENVIRONMENT")
            .unwrap_or_else(|| "development".to_string());

        let port = get("PORT").and_then(|v| v.parse().ok()).unwrap_or(3000);

        let cleanup = CleanupConfig {
            orphaned_images_rpc: get("CLEANUP_ORPHANED_IMAGES_RPC"),
            audit_logs_rpc: get("CLEANUP_AUDIT_LOGS_RPC"),
            audit_log_retention_days: get("AUDIT_LOG_RETENTION_DAYS").and_then(|v| v.parse().ok()),
        };

        Self {
            cron_secret: get("CRON_SECRET"),
            public_data_url: get("PUBLIC_DATA_URL").map(|u| u.trim_end_matches('/').to_string()),
            public_data_anon_key: get("PUBLIC_DATA_ANON_KEY"),
            service_role_key: get("SERVICE_ROLE_KEY"),
            environment,
            version: get("APP_VERSION"),
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            health_check_table: get("HEALTH_CHECK_TABLE").unwrap_or_else(|| "listings".to_string()),
            session_cookie: get("SESSION_COOKIE").unwrap_or_else(|| "sb-access-token".to_string()),
            cleanup,
        }
    }

    /// 返回缺失的必需配置项名称
    pub fn missing_required(&self) -> Vec<&'static str> {
        let values = [
            &self.public_data_url,
            &self.public_data_anon_key,
            &self.service_role_key,
        ];
        REQUIRED_ENV_VARS
            .iter()
            .zip(values)
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| *name)
            .collect()
    }

    /// 对外展示的版本号
    pub fn version_or_unknown(&self) -> &str {
        self.version.as_deref().unwrap_or("unknown")
    }
}

/// 加载配置项，支持 fallback
fn load_with_fallback<F>(get: &F, primary: &str, fallback: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    get(primary).or_else(|| get(fallback))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> EnvConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.environment, "development");
        assert_eq!(config.port, 3000);
        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(config.health_check_table, "listings");
        assert_eq!(config.version_or_unknown(), "unknown");
        assert!(config.cron_secret.is_none());
        assert_eq!(config.cleanup, CleanupConfig::default());
    }

    #[test]
    fn test_load_with_fallback() {
        let config = config_from(&[("ENVIRONMENT", "staging")]);
        assert_eq!(config.environment, "staging");

        let config = config_from(&[("APP_ENV", "production"), ("ENVIRONMENT", "staging")]);
        assert_eq!(config.environment, "production");
    }

    #[test]
    fn test_empty_values_count_as_missing() {
        let config = config_from(&[("CRON_SECRET", ""), ("PUBLIC_DATA_URL", "  ")]);
        assert!(config.cron_secret.is_none());
        assert!(config.public_data_url.is_none());
    }

    #[test]
    fn test_missing_required_keeps_declared_order() {
        let config = config_from(&[("PUBLIC_DATA_URL", "https://db.example.com")]);
        assert_eq!(
            config.missing_required(),
            vec!["PUBLIC_DATA_ANON_KEY", "SERVICE_ROLE_KEY"]
        );

        let config = config_from(&[
            ("PUBLIC_DATA_URL", "https://db.example.com"),
            ("PUBLIC_DATA_ANON_KEY", "anon"),
            ("SERVICE_ROLE_KEY", "service"),
        ]);
        assert!(config.missing_required().is_empty());
    }

    #[test]
    fn test_data_url_trailing_slash_trimmed() {
        let config = config_from(&[("PUBLIC_DATA_URL", "https://db.example.com/")]);
        assert_eq!(config.public_data_url.as_deref(), Some("https://db.example.com"));
    }

    #[test]
    fn test_cleanup_config() {
        let config = config_from(&[
            ("CLEANUP_ORPHANED_IMAGES_RPC", "delete_orphaned_images"),
            ("AUDIT_LOG_RETENTION_DAYS", "not-a-number"),
        ]);
        assert_eq!(
            config.cleanup.orphaned_images_rpc.as_deref(),
            Some("delete_orphaned_images")
        );
        assert!(config.cleanup.audit_logs_rpc.is_none());
        assert!(config.cleanup.audit_log_retention_days.is_none());
    }
}
