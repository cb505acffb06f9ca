//! 登录门禁状态机
//!
//! 客户端的"未登录则跳转"逻辑本质上是两个状态：身份查询中 / 已得出结果。
//! 每次状态变化调用一次 [`AuthGate::react`]，得到要执行的唯一动作。
//! 服务端门禁在身份查询完成后直接调用 [`AuthGate::resolve`]，与 `Resolved` 分支同一逻辑。

use url::form_urlencoded;

use super::user::User;

/// 默认登录页
pub const DEFAULT_SIGN_IN_PATH: &str = "/auth/sign-in";

/// 登录页上携带返回地址的查询参数
pub const RETURN_TO_PARAM: &str = "redirectTo";

/// 门禁状态
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateState {
    /// 身份查询进行中
    Loading,
    /// 身份查询完成
    Resolved(Option<User>),
}

/// 状态对应的动作
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateAction {
    /// 渲染占位内容
    RenderFallback(String),
    /// 渲染受保护内容
    RenderChildren(User),
    /// 不渲染内容，跳转到目标地址
    Navigate(String),
}

/// 默认占位内容：居中的加载动画
pub const DEFAULT_FALLBACK_HTML: &str = r#"<div class="gate-fallback" style="display:flex;justify-content:center;align-items:center;min-height:50vh"><div class="spinner" role="status" aria-label="Loading"></div></div>"#;

/// 登录门禁
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthGate {
    redirect_target: String,
    fallback: String,
}

impl Default for AuthGate {
    fn default() -> Self {
        Self::new(DEFAULT_SIGN_IN_PATH)
    }
}

impl AuthGate {
    pub fn new(redirect_target: impl Into<String>) -> Self {
        Self {
            redirect_target: redirect_target.into(),
            fallback: DEFAULT_FALLBACK_HTML.to_string(),
        }
    }

    /// 跳转到默认登录页，登录后返回 `return_to`
    pub fn returning_to(return_to: &str) -> Self {
        Self::new(sign_in_path(Some(return_to)))
    }

    /// 替换查询中的占位内容
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    pub fn redirect_target(&self) -> &str {
        &self.redirect_target
    }

    /// 状态变化时的唯一反应函数，重复调用结果相同
    pub fn react(&self, state: &GateState) -> GateAction {
        match state {
            GateState::Loading => GateAction::RenderFallback(self.fallback.clone()),
            GateState::Resolved(user) => match self.resolve(user.clone()) {
                Ok(user) => GateAction::RenderChildren(user),
                Err(target) => GateAction::Navigate(target),
            },
        }
    }

    /// 身份查询完成后的结果：有用户则返回用户，否则返回跳转地址
    pub fn resolve(&self, user: Option<User>) -> Result<User, String> {
        user.ok_or_else(|| self.redirect_target.clone())
    }
}

/// 构造登录页地址
///
/// 只接受站内路径作为返回地址，其他值忽略
pub fn sign_in_path(return_to: Option<&str>) -> String {
    match return_to.filter(|path| is_local_path(path)) {
        Some(path) => {
            let encoded: String = form_urlencoded::byte_serialize(path.as_bytes()).collect();
            format!("{}?{}={}", DEFAULT_SIGN_IN_PATH, RETURN_TO_PARAM, encoded)
        }
        None => DEFAULT_SIGN_IN_PATH.to_string(),
    }
}

/// 站内路径：以 `/` 开头，且不是协议相对地址
pub fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}
