//! Health / Status Handlers

use axum::{extract::State, http::Uri, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::application::GetEngineStatus;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

#[derive(Serialize)]
pub struct RootResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub version: &'static str,
    pub environment: String,
    pub engine_available: bool,
}

/// 根路径健康检查（不重新探测引擎）
pub async fn root(State(state): State<Arc<AppState>>) -> Json<RootResponse> {
    let engine = state
        .engine_status_handler
        .handle(GetEngineStatus { probe: false })
        .await;

    Json(RootResponse {
        status: "healthy",
        message: "Piper-TTS API is running",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.info.environment.clone(),
        engine_available: engine.binary_found,
    })
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub engine: &'static str,
    pub engine_binary_path: Option<String>,
    pub voices_loaded: usize,
}

/// 负载均衡用的详细健康检查，会重新运行 `piper --help`
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let engine = state
        .engine_status_handler
        .handle(GetEngineStatus { probe: true })
        .await;

    let status = if engine.healthy { "healthy" } else { "unhealthy" };
    Json(HealthResponse {
        status,
        engine: status,
        engine_binary_path: engine.binary_path.map(|p| p.display().to_string()),
        voices_loaded: engine.voices_indexed,
    })
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub voices_available: usize,
    pub data_dir: String,
    pub output_dir: String,
    pub engine_binary: Option<String>,
    pub engine_available: bool,
    pub environment: String,
}

/// 服务状态
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let engine = state
        .engine_status_handler
        .handle(GetEngineStatus { probe: false })
        .await;

    Json(StatusResponse {
        status: "running",
        version: env!("CARGO_PKG_VERSION"),
        voices_available: engine.voices_indexed,
        data_dir: state.info.data_dir.display().to_string(),
        output_dir: state.info.output_dir.display().to_string(),
        engine_binary: engine.binary_path.map(|p| p.display().to_string()),
        engine_available: engine.binary_found,
        environment: state.info.environment.clone(),
    })
}

/// 未匹配路由
pub async fn not_found(uri: Uri) -> ApiError {
    tracing::debug!(uri = %uri, "No route matched");
    ApiError::NotFound("Endpoint not found".to_string())
}
