//! Voice Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("Voice model '{0}' not found")]
    NotFound(String),

    #[error("Invalid voice id: {0}")]
    InvalidId(String),

    #[error("Failed to scan voice assets: {0}")]
    ScanFailed(String),
}
