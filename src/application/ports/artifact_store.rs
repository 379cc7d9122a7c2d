//! Artifact Store Port - 合成产物存储
//!
//! 输出目录只追加新文件，从不原地修改

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::synthesis::{ArtifactId, ArtifactIdError, SynthesisArtifact};

/// 产物存储错误
#[derive(Debug, Error)]
pub enum ArtifactStoreError {
    #[error("Invalid artifact id: {0}")]
    InvalidId(#[from] ArtifactIdError),

    #[error("Artifact not found: {0}")]
    NotFound(String),

    #[error("Artifact is empty: {0}")]
    Empty(String),

    #[error("IO error: {0}")]
    Io(String),
}

/// Artifact Store Port
#[async_trait]
pub trait ArtifactStorePort: Send + Sync {
    /// 分配新的产物 ID 和输出路径（不创建文件）
    fn allocate(&self) -> (ArtifactId, PathBuf);

    /// 发布已写入的产物，读取大小和时间戳
    async fn publish(&self, id: &ArtifactId) -> Result<SynthesisArtifact, ArtifactStoreError>;

    /// 查找已发布产物的路径
    ///
    /// 在访问文件系统之前拒绝包含路径穿越或分隔符的 ID
    async fn locate(&self, raw_id: &str) -> Result<PathBuf, ArtifactStoreError>;

    /// 删除未发布的残留输出（尽力而为）
    async fn discard(&self, id: &ArtifactId);
}
