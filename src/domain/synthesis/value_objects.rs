//! Synthesis Context - Value Objects

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

use super::SynthesisError;
use crate::domain::voice::VoiceId;

/// 合成请求
///
/// 不变量:
/// - text 已去除首尾空白，非空，且字符数不超过上限
/// - voice_id 已去除首尾空白，非空
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    text: String,
    voice_id: VoiceId,
}

impl SynthesisRequest {
    pub fn new(
        text: &str,
        voice: &str,
        max_text_chars: usize,
    ) -> Result<Self, SynthesisError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SynthesisError::validation("Empty text or voice"));
        }

        let char_count = text.chars().count();
        if char_count > max_text_chars {
            return Err(SynthesisError::validation(format!(
                "Text too long (max {} characters)",
                max_text_chars
            )));
        }

        let voice_id =
            VoiceId::new(voice).map_err(|_| SynthesisError::validation("Empty text or voice"))?;

        Ok(Self {
            text: text.to_string(),
            voice_id,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// 字符数（日志只记录长度，不记录内容）
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn voice_id(&self) -> &VoiceId {
        &self.voice_id
    }
}

/// 产物 ID 校验错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArtifactIdError {
    #[error("artifact id is empty")]
    Empty,

    #[error("artifact id contains a path traversal sequence")]
    Traversal,

    #[error("artifact id contains a path separator")]
    Separator,
}

/// 产物唯一标识
///
/// 新分配的 ID 为 UUID v4 的 32 位小写十六进制形式
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactId(String);

impl ArtifactId {
    /// 生成新的随机 ID
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// 解析外部传入的 ID，拒绝一切可能逃逸输出目录的输入
    ///
    /// 纯字符串检查，不访问文件系统
    pub fn parse(raw: &str) -> Result<Self, ArtifactIdError> {
        if raw.is_empty() {
            return Err(ArtifactIdError::Empty);
        }
        if raw.contains("..") {
            return Err(ArtifactIdError::Traversal);
        }
        if raw.contains(['/', '\\', '\0']) {
            return Err(ArtifactIdError::Separator);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 已发布的合成产物
#[derive(Debug, Clone)]
pub struct SynthesisArtifact {
    pub id: ArtifactId,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
}

impl SynthesisArtifact {
    /// 产物文件名，如 `<id>.wav`
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.id.to_string())
    }
}
