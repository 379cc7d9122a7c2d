//! HTTP Error Handling
//!
//! 失败响应统一为 `{ "error": "..." }`，HTTP 状态码反映失败类别

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::ApplicationError;
use crate::domain::synthesis::{SynthesisError, SynthesisFailureKind};

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    PayloadTooLarge(String),
    Internal(String),
    ServiceUnavailable(String),
    GatewayTimeout(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::GatewayTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::PayloadTooLarge(msg)
            | ApiError::Internal(msg)
            | ApiError::ServiceUnavailable(msg)
            | ApiError::GatewayTimeout(msg) => msg,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self.message(), "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self.message(), "Request rejected");
        }

        (status, Json(ErrorResponse::new(self.message()))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge("Request too large".to_string())
        } else {
            ApiError::BadRequest(rejection.body_text())
        }
    }
}

impl From<SynthesisError> for ApiError {
    fn from(e: SynthesisError) -> Self {
        // 引擎细节（stderr、路径）只写日志，不返回给调用方
        match e.kind() {
            SynthesisFailureKind::ValidationRejected | SynthesisFailureKind::ModelNotFound => {
                ApiError::BadRequest(e.to_string())
            }
            SynthesisFailureKind::EngineUnavailable => ApiError::ServiceUnavailable(
                "Text-to-speech service is not available. Piper binary not found.".to_string(),
            ),
            SynthesisFailureKind::Timeout => {
                ApiError::GatewayTimeout("Speech synthesis timed out".to_string())
            }
            SynthesisFailureKind::EngineFailure => ApiError::Internal(e.to_string()),
            SynthesisFailureKind::OutputNotProduced | SynthesisFailureKind::Storage => {
                ApiError::Internal("Audio file generation failed".to_string())
            }
        }
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::Synthesis(e) => ApiError::from(e),
            ApplicationError::NotFound { resource_type, id } => {
                ApiError::NotFound(format!("{} not found: {}", resource_type, id))
            }
            ApplicationError::ValidationError(msg) => ApiError::BadRequest(msg),
            ApplicationError::StorageError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                ApiError::Internal("Internal server error".to_string())
            }
        }
    }
}
