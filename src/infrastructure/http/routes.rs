//! HTTP Routes
//!
//! API Endpoints:
//! - /                      GET   存活检查
//! - /api/health            GET   健康检查（重新探测引擎）
//! - /api/status            GET   服务状态
//! - /api/voices            GET   音色目录及安装状态
//! - /api/voices/refresh    POST  重建音色索引
//! - /api/synthesize        POST  合成语音
//! - /outputs/{id}.wav      GET   下载合成结果

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::root))
        .route("/outputs/:file_name", get(handlers::serve_output))
        .nest("/api", api_routes())
        .fallback(handlers::not_found)
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/status", get(handlers::status))
        .route("/voices", get(handlers::list_voices))
        .route("/voices/refresh", post(handlers::refresh_voices))
        .route("/synthesize", post(handlers::synthesize))
}
