//! 健康检查领域模型

use chrono::{DateTime, Utc};
use serde::Serialize;

/// 健康状态
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// 健康检查结果，每次请求重新构建
#[derive(Clone, Debug, Serialize)]
pub struct HealthResult {
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthResult {
    pub fn healthy(environment: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Healthy,
            timestamp: Utc::now(),
            environment: Some(environment.into()),
            database: Some("connected"),
            version: Some(version.into()),
            error: None,
        }
    }

    pub fn unhealthy(error: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            timestamp: Utc::now(),
            environment: None,
            database: None,
            version: None,
            error: Some(error.into()),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_healthy_payload_shape() {
        let json = serde_json::to_value(HealthResult::healthy("production", "1.2.0")).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["environment"], "production");
        assert_eq!(json["database"], "connected");
        assert_eq!(json["version"], "1.2.0");
        assert!(json.get("error").is_none());
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_unhealthy_payload_shape() {
        let result = HealthResult::unhealthy("connection refused");
        assert!(!result.is_healthy());

        let json = serde_json::to_value(result).unwrap();
        let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["error", "status", "timestamp"]);
        assert_eq!(json["status"], "unhealthy");
    }
}
