//! API 模块
//!
//! HTTP handlers 和路由组装

pub mod cleanup;
pub mod client_errors;
pub mod health;
pub mod pages;

use axum::Router;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// 构建完整的路由
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .merge(health::router())
        // Scheduled jobs
        .merge(cleanup::router())
        // Client error tracking
        .merge(client_errors::router())
        // Pages
        .merge(pages::router())
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
