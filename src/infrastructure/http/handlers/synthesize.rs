//! Synthesize Handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use std::sync::Arc;

use crate::application::Synthesize;
use crate::infrastructure::http::dto::{SynthesizeRequest, SynthesizeResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 合成语音
///
/// 请求: `{ "text": "...", "voice": "<voice id>" }`
/// 响应: `{ "url": "/outputs/<id>.wav" }`
pub async fn synthesize(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SynthesizeRequest>, JsonRejection>,
) -> Result<Json<SynthesizeResponse>, ApiError> {
    let Json(req) = payload?;

    let (Some(text), Some(voice)) = (req.text, req.voice) else {
        return Err(ApiError::BadRequest(
            "Missing 'text' or 'voice' field".to_string(),
        ));
    };

    let result = state
        .synthesize_handler
        .handle(Synthesize { text, voice })
        .await?;

    Ok(Json(SynthesizeResponse {
        url: format!("/outputs/{}", result.file_name),
    }))
}
