//! Artifact Queries

/// 定位已发布产物
#[derive(Debug, Clone)]
pub struct LocateArtifact {
    /// 外部传入的原始 ID（不可信）
    pub artifact_id: String,
}
