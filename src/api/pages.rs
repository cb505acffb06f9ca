//! 页面路由
//!
//! 需要登录的页面先经过登录门禁，其余页面直接渲染

use axum::{extract::Query, response::Html, routing::get, Router};
use serde::Deserialize;
use std::sync::Arc;

use crate::domain::gate::is_local_path;
use crate::domain::User;
use crate::middleware::RequireUser;
use crate::state::AppState;

/// 创建页面路由
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/listings/new", get(new_listing_page))
        .route("/account", get(account_page))
        .route("/search-test", get(search_test_page))
        .route("/auth/sign-in", get(sign_in_page))
}

/// 发布商品表单
///
/// GET /listings/new
/// 需要登录
async fn new_listing_page(RequireUser(user): RequireUser) -> Html<String> {
    Html(render_listing_form(&user))
}

/// 账户页
///
/// GET /account
/// 需要登录
async fn account_page(RequireUser(user): RequireUser) -> Html<String> {
    let body = format!(
        r#"<h1>My account</h1><p>Signed in as <strong>{}</strong></p>"#,
        escape_html(&user.display_name())
    );
    Html(layout("My account", &body))
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: Option<String>,
}

/// 搜索测试页
///
/// GET /search-test
/// 无需认证
async fn search_test_page(Query(query): Query<SearchQuery>) -> Html<String> {
    let q = query.q.unwrap_or_default();
    let echo = if q.is_empty() {
        String::new()
    } else {
        format!(
            r#"<p data-testid="search-echo">Searching for: {}</p>"#,
            escape_html(&q)
        )
    };
    let body = format!(
        r#"<h1>Search test</h1>
<form method="get" action="/search-test" role="search">
  <input type="search" name="q" value="{}" placeholder="Search board games" data-testid="search-input">
  <button type="submit">Search</button>
</form>
{}"#,
        escape_html(&q),
        echo
    );
    Html(layout("Search test", &body))
}

#[derive(Debug, Deserialize)]
struct SignInQuery {
    #[serde(rename = "redirectTo", default)]
    redirect_to: Option<String>,
}

/// 登录页
///
/// GET /auth/sign-in
async fn sign_in_page(Query(query): Query<SignInQuery>) -> Html<String> {
    // 只回显站内路径
    let return_to = query
        .redirect_to
        .as_deref()
        .filter(|path| is_local_path(path))
        .unwrap_or("/");
    let body = format!(
        r#"<h1>Sign in</h1>
<form method="post" action="/auth/sign-in">
  <input type="hidden" name="redirectTo" value="{}">
  <input type="email" name="email" required>
  <input type="password" name="password" required>
  <button type="submit">Sign in</button>
</form>"#,
        escape_html(return_to)
    );
    Html(layout("Sign in", &body))
}

fn render_listing_form(user: &User) -> String {
    let body = format!(
        r#"<h1>Create a listing</h1>
<p>Listing as {}</p>
<form method="post" action="/listings" enctype="multipart/form-data">
  <input type="text" name="title" placeholder="Game title" required>
  <select name="condition">
    <option value="new">New</option>
    <option value="like_new">Like new</option>
    <option value="good">Good</option>
    <option value="fair">Fair</option>
  </select>
  <input type="number" name="price" min="0" step="0.01" required>
  <textarea name="description"></textarea>
  <input type="file" name="images" accept="image/*" multiple>
  <button type="submit">Publish</button>
</form>"#,
        escape_html(&user.display_name())
    );
    layout("Create a listing", &body)
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>{} | Board Game Market</title></head><body><main>{}</main></body></html>",
        escape_html(title),
        body
    )
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
