//! 前端错误上报模型

use serde::Deserialize;

/// 浏览器端捕获的错误
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientErrorReport {
    pub message: String,
    #[serde(default)]
    pub stack: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub component_stack: Option<String>,
}

/// 单条上报允许的最大字段长度，超出部分截断后再写日志
pub const MAX_FIELD_LEN: usize = 4096;

/// 按字符边界截断
pub fn truncate(value: &str) -> &str {
    match value.char_indices().nth(MAX_FIELD_LEN) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}
