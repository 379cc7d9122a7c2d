//! Voice HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{ListVoices, RefreshVoices};
use crate::infrastructure::http::dto::{RefreshVoicesResponse, VoiceDto, VoicesResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 获取音色列表（含安装状态）
pub async fn list_voices(
    State(state): State<Arc<AppState>>,
) -> Result<Json<VoicesResponse>, ApiError> {
    let result = state.list_voices_handler.handle(ListVoices).await?;

    Ok(Json(VoicesResponse {
        voices: result.into_iter().map(VoiceDto::from).collect(),
    }))
}

/// 重建音色索引（安装新模型后调用）
pub async fn refresh_voices(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RefreshVoicesResponse>, ApiError> {
    let voices_indexed = state.refresh_voices_handler.handle(RefreshVoices).await?;

    Ok(Json(RefreshVoicesResponse { voices_indexed }))
}
