//! 测试用的外部服务替身

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::config::EnvConfig;
use crate::domain::User;
use crate::infra::{DataStore, DataStoreError, IdentityError, IdentityProvider};
use crate::state::AppState;

/// 全部必需配置项都已设置的环境
pub const HEALTHY_ENV: &[(&str, &str)] = &[
    ("PUBLIC_DATA_URL", "https://db.example.com"),
    ("PUBLIC_DATA_ANON_KEY", "anon-key"),
    ("SERVICE_ROLE_KEY", "service-role-key"),
    ("APP_ENV", "test"),
    ("APP_VERSION", "1.0.0"),
    ("CRON_SECRET", "s3cret"),
];

/// 可编程的数据服务替身，clone 之间共享调用记录
#[derive(Clone, Default)]
pub struct FakeDataStore {
    select_error: Option<String>,
    procedures: Arc<HashMap<String, Result<Value, String>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeDataStore {
    /// 查询失败，错误消息为 `message`
    pub fn failing_select(message: &str) -> Self {
        Self {
            select_error: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// 设置存储过程的返回值
    pub fn with_procedure(mut self, name: &str, result: Result<Value, &str>) -> Self {
        let mut procedures = (*self.procedures).clone();
        procedures.insert(name.to_string(), result.map_err(str::to_string));
        self.procedures = Arc::new(procedures);
        self
    }

    /// 已执行的调用，格式 `select:<table>` / `rpc:<name>`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn procedure_calls(&self) -> usize {
        self.calls().iter().filter(|c| c.starts_with("rpc:")).count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl DataStore for FakeDataStore {
    async fn select_limit(&self, table: &str, limit: usize) -> Result<Vec<Value>, DataStoreError> {
        self.record(format!("select:{}", table));
        match &self.select_error {
            Some(message) => Err(DataStoreError::Status {
                status: 500,
                message: message.clone(),
            }),
            None => Ok(vec![json!({ "id": 1 }); limit.min(1)]),
        }
    }

    async fn call_procedure(&self, name: &str, _params: Value) -> Result<Value, DataStoreError> {
        self.record(format!("rpc:{}", name));
        match self.procedures.get(name) {
            Some(Ok(value)) => Ok(value.clone()),
            Some(Err(message)) => Err(DataStoreError::Status {
                status: 400,
                message: message.clone(),
            }),
            None => Err(DataStoreError::Status {
                status: 404,
                message: format!("Could not find the function {}", name),
            }),
        }
    }
}

/// 认证服务替身：token -> 用户
#[derive(Clone, Default)]
pub struct FakeIdentity {
    users: HashMap<String, User>,
    failing: bool,
}

impl FakeIdentity {
    pub fn with_user(token: &str, email: &str) -> Self {
        let mut users = HashMap::new();
        users.insert(
            token.to_string(),
            User {
                id: Uuid::new_v4(),
                email: Some(email.to_string()),
            },
        );
        Self {
            users,
            failing: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            users: HashMap::new(),
            failing: true,
        }
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn current_user(&self, access_token: &str) -> Result<Option<User>, IdentityError> {
        if self.failing {
            return Err(IdentityError::Status(502));
        }
        Ok(self.users.get(access_token).cloned())
    }
}

/// 使用给定环境变量构建配置
pub fn test_config(env: &[(&str, &str)]) -> EnvConfig {
    let vars: HashMap<String, String> = env
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    EnvConfig::from_lookup(|key| vars.get(key).cloned())
}

/// 使用给定环境变量与替身组装应用状态
pub fn test_state(
    env: &[(&str, &str)],
    data_store: FakeDataStore,
    identity: FakeIdentity,
) -> Arc<AppState> {
    Arc::new(AppState::new(
        test_config(env),
        Arc::new(data_store),
        Arc::new(identity),
    ))
}

/// 读取响应体为 JSON
pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// 读取响应体为文本
pub async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
