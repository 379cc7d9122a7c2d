//! Output Handler - 提供已发布的合成产物

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use std::sync::Arc;
use tokio_util::io::ReaderStream;

use crate::application::{ApplicationError, LocateArtifact};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 流式返回 WAV 文件
///
/// 路径参数为 `<id>.wav`（也接受不带扩展名的 `<id>`）
pub async fn serve_output(
    State(state): State<Arc<AppState>>,
    Path(file_name): Path<String>,
) -> Result<Response, ApiError> {
    let artifact_id = file_name
        .strip_suffix(".wav")
        .unwrap_or(&file_name)
        .to_string();

    let path = state
        .locate_artifact_handler
        .handle(LocateArtifact { artifact_id })
        .await
        .map_err(|e| match e {
            ApplicationError::NotFound { .. } => {
                ApiError::NotFound("Audio file not found".to_string())
            }
            other => ApiError::from(other),
        })?;

    let file = tokio::fs::File::open(&path)
        .await
        .map_err(|_| ApiError::NotFound("Audio file not found".to_string()))?;

    let file_size = file
        .metadata()
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to get file metadata: {}", e)))?
        .len();

    tracing::debug!(file = %file_name, size = file_size, "Serving audio file");

    let stream = ReaderStream::new(file);
    let body = Body::from_stream(stream);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "audio/wav")
        .header(header::CONTENT_LENGTH, file_size)
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .body(body)
        .map_err(|e| ApiError::Internal(e.to_string()))
}
