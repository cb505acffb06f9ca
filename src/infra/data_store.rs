//! 数据服务 HTTP Client
//!
//! 通过 REST 接口访问托管的关系型数据库：有限条数的查询，以及存储过程调用

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// 数据服务错误类型
#[derive(Debug, Error)]
pub enum DataStoreError {
    #[error("Data store URL is not configured")]
    NotConfigured,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// 服务端返回非成功状态码，message 取自响应体
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// 数据服务
#[async_trait]
pub trait DataStore: Send + Sync {
    /// 读取最多 `limit` 行
    async fn select_limit(&self, table: &str, limit: usize) -> Result<Vec<Value>, DataStoreError>;

    /// 调用存储过程，返回其原始结果
    async fn call_procedure(&self, name: &str, params: Value) -> Result<Value, DataStoreError>;
}

/// 基于 REST 的数据服务客户端
#[derive(Clone)]
pub struct RestDataStore {
    client: Client,
    base_url: Option<String>,
    api_key: Option<String>,
}

impl RestDataStore {
    /// 创建数据服务客户端
    ///
    /// # Arguments
    /// * `client` - 共享的 HTTP client
    /// * `base_url` - 服务地址（未配置时所有请求返回 `NotConfigured`）
    /// * `api_key` - 请求使用的 key
    pub fn new(client: Client, base_url: Option<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }

    fn endpoint(&self, path: &str) -> Result<String, DataStoreError> {
        let base = self.base_url.as_deref().ok_or(DataStoreError::NotConfigured)?;
        Ok(format!("{}/rest/v1/{}", base, path))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("apikey", key).bearer_auth(key),
            None => request,
        }
    }
}

#[async_trait]
impl DataStore for RestDataStore {
    async fn select_limit(&self, table: &str, limit: usize) -> Result<Vec<Value>, DataStoreError> {
        let url = self.endpoint(table)?;
        debug!(table = %table, limit = limit, "Selecting rows");

        let response = self
            .authorize(self.client.get(&url))
            .query(&[("select", "*".to_string()), ("limit", limit.to_string())])
            .send()
            .await?;

        match check_status(response).await?.json::<Value>().await? {
            Value::Array(rows) => Ok(rows),
            other => Err(DataStoreError::UnexpectedResponse(format!(
                "expected an array of rows, got {}",
                other
            ))),
        }
    }

    async fn call_procedure(&self, name: &str, params: Value) -> Result<Value, DataStoreError> {
        let url = self.endpoint(&format!("rpc/{}", name))?;
        debug!(procedure = %name, "Calling stored procedure");

        let response = self
            .authorize(self.client.post(&url))
            .json(&params)
            .send()
            .await?;

        let body = check_status(response).await?.text().await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| DataStoreError::UnexpectedResponse(e.to_string()))
    }
}

/// 非成功状态码转换为错误，错误消息优先取响应体中的 `message` 字段
async fn check_status(response: Response) -> Result<Response, DataStoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("Data store returned {}", status)
            } else {
                body
            }
        });

    Err(DataStoreError::Status {
        status: status.as_u16(),
        message,
    })
}

/// 从存储过程的返回值中提取受影响行数
///
/// 支持直接返回数字、`{"count": n}` / `{"deleted": n}` 对象，以及单元素数组
pub fn affected_rows(value: &Value) -> Option<u64> {
    match value {
        Value::Null => Some(0),
        Value::Number(n) => n.as_u64(),
        Value::Object(map) => ["count", "deleted", "affected"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_u64)),
        Value::Array(items) if items.len() == 1 => affected_rows(&items[0]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_affected_rows_shapes() {
        assert_eq!(affected_rows(&json!(7)), Some(7));
        assert_eq!(affected_rows(&Value::Null), Some(0));
        assert_eq!(affected_rows(&json!({ "count": 4 })), Some(4));
        assert_eq!(affected_rows(&json!({ "deleted": 2 })), Some(2));
        assert_eq!(affected_rows(&json!([{ "count": 5 }])), Some(5));
        assert_eq!(affected_rows(&json!("seven")), None);
        assert_eq!(affected_rows(&json!([1, 2])), None);
    }

    #[tokio::test]
    async fn test_unconfigured_store_fails_fast() {
        let store = RestDataStore::new(Client::new(), None, None);
        let err = store.select_limit("listings", 1).await.unwrap_err();
        assert!(matches!(err, DataStoreError::NotConfigured));

        let err = store.call_procedure("noop", json!({})).await.unwrap_err();
        assert_eq!(err.to_string(), "Data store URL is not configured");
    }

    #[test]
    fn test_status_error_displays_message_only() {
        let err = DataStoreError::Status {
            status: 404,
            message: "relation \"public.listings\" does not exist".to_string(),
        };
        assert_eq!(err.to_string(), "relation \"public.listings\" does not exist");
    }
}
