//! 用户领域模型
//!
//! 用户记录完全由外部认证服务持有，这里只读取

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 当前登录用户
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

impl User {
    /// 页面展示用名称，没有邮箱时使用 id
    pub fn display_name(&self) -> String {
        self.email.clone().unwrap_or_else(|| self.id.to_string())
    }
}
