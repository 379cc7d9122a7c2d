//! File Artifact Store - 文件系统产物存储实现
//!
//! 实现 ArtifactStorePort trait
//!
//! 目录结构: `<output_dir>/<artifact_id>.wav`

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::{ArtifactStoreError, ArtifactStorePort};
use crate::domain::synthesis::{ArtifactId, SynthesisArtifact};

/// 产物文件扩展名
const ARTIFACT_EXTENSION: &str = "wav";

/// 文件系统产物存储
pub struct FileArtifactStore {
    /// 输出根目录（绝对路径）
    output_dir: PathBuf,
}

impl FileArtifactStore {
    /// 创建新的产物存储，确保输出目录存在
    pub async fn new(output_dir: impl AsRef<Path>) -> Result<Self, ArtifactStoreError> {
        let output_dir = output_dir.as_ref();

        fs::create_dir_all(output_dir)
            .await
            .map_err(|e| ArtifactStoreError::Io(e.to_string()))?;

        let output_dir = fs::canonicalize(output_dir)
            .await
            .map_err(|e| ArtifactStoreError::Io(e.to_string()))?;

        Ok(Self { output_dir })
    }

    fn artifact_path(&self, id: &ArtifactId) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", id, ARTIFACT_EXTENSION))
    }
}

#[async_trait]
impl ArtifactStorePort for FileArtifactStore {
    fn allocate(&self) -> (ArtifactId, PathBuf) {
        let id = ArtifactId::generate();
        let path = self.artifact_path(&id);
        (id, path)
    }

    async fn publish(&self, id: &ArtifactId) -> Result<SynthesisArtifact, ArtifactStoreError> {
        let path = self.artifact_path(id);

        let metadata = fs::metadata(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => ArtifactStoreError::NotFound(id.to_string()),
            _ => ArtifactStoreError::Io(e.to_string()),
        })?;

        if !metadata.is_file() || metadata.len() == 0 {
            return Err(ArtifactStoreError::Empty(id.to_string()));
        }

        let created_at = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        tracing::debug!(
            artifact_id = %id,
            size_bytes = metadata.len(),
            "Artifact published"
        );

        Ok(SynthesisArtifact {
            id: id.clone(),
            path,
            size_bytes: metadata.len(),
            created_at,
        })
    }

    async fn locate(&self, raw_id: &str) -> Result<PathBuf, ArtifactStoreError> {
        // 先做纯字符串校验，再访问文件系统
        let id = ArtifactId::parse(raw_id)?;
        let path = self.artifact_path(&id);

        match fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => Ok(path),
            Ok(_) => Err(ArtifactStoreError::NotFound(id.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(ArtifactStoreError::NotFound(id.to_string()))
            }
            Err(e) => Err(ArtifactStoreError::Io(e.to_string())),
        }
    }

    async fn discard(&self, id: &ArtifactId) {
        let path = self.artifact_path(id);
        match fs::remove_file(&path).await {
            Ok(()) => tracing::debug!(artifact_id = %id, "Discarded partial output"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(artifact_id = %id, error = %e, "Failed to discard output"),
        }
    }
}
