//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::application::ports::ArtifactStoreError;
use crate::domain::synthesis::SynthesisError;
use crate::domain::voice::VoiceError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 合成失败（已分类）
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type,
            id: id.into(),
        }
    }
}

impl From<VoiceError> for ApplicationError {
    fn from(err: VoiceError) -> Self {
        match err {
            VoiceError::NotFound(id) => Self::not_found("Voice", id),
            VoiceError::InvalidId(msg) => Self::ValidationError(msg),
            VoiceError::ScanFailed(msg) => Self::StorageError(msg),
        }
    }
}

impl From<ArtifactStoreError> for ApplicationError {
    fn from(err: ArtifactStoreError) -> Self {
        match err {
            ArtifactStoreError::InvalidId(e) => Self::ValidationError(e.to_string()),
            ArtifactStoreError::NotFound(id) => Self::not_found("Artifact", id),
            ArtifactStoreError::Empty(id) => Self::not_found("Artifact", id),
            ArtifactStoreError::Io(msg) => Self::StorageError(msg),
        }
    }
}
