//! API 路由模块
//!
//! - [`rpc`] - 单端点 `/api?action=<name>`
//! - [`health`] - 健康检查

pub mod health;
pub mod rpc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// 请求体上限
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Build the Axum router with state and middleware applied
pub fn build_app(state: ServerState) -> Router {
    Router::<ServerState>::new()
        .merge(rpc::router())
        .merge(health::router())
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
