//! Voice Context - Value Objects

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::VoiceError;

/// 音色 ID 最大长度
const MAX_VOICE_ID_LEN: usize = 200;

/// 音色唯一标识（如 `en_US-lessac-high`）
///
/// 同时也是模型文件名的主干：`<id>.<ext>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoiceId(String);

impl VoiceId {
    /// 去除首尾空白后构造，空字符串或超长 ID 会被拒绝
    pub fn new(id: impl AsRef<str>) -> Result<Self, VoiceError> {
        let id = id.as_ref().trim();
        if id.is_empty() {
            return Err(VoiceError::InvalidId("voice id cannot be empty".to_string()));
        }
        if id.len() > MAX_VOICE_ID_LEN {
            return Err(VoiceError::InvalidId(format!(
                "voice id longer than {} bytes",
                MAX_VOICE_ID_LEN
            )));
        }
        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VoiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 音色目录条目
///
/// 不可变；是否已安装不属于条目本身，每次查询时重新计算
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub id: String,
    pub name: String,
    pub lang: String,
    pub description: String,
}

impl Voice {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        lang: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            lang: lang.into(),
            description: description.into(),
        }
    }
}

/// 目录条目 + 安装状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceStatus {
    pub voice: Voice,
    pub installed: bool,
}

/// 已解析的模型资产
///
/// 不变量:
/// - model_path 的文件名为 `<voice_id>.<ext>`
/// - config_path 存在时为 `<model_path>.json`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelAsset {
    voice_id: VoiceId,
    model_path: PathBuf,
    config_path: Option<PathBuf>,
}

impl ModelAsset {
    /// 从模型文件路径构造，自动探测同目录下的 sidecar 配置
    pub fn discover(voice_id: VoiceId, model_path: PathBuf) -> Self {
        let config_path = sidecar_path(&model_path).filter(|p| p.is_file());
        Self {
            voice_id,
            model_path,
            config_path,
        }
    }

    pub fn voice_id(&self) -> &VoiceId {
        &self.voice_id
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}

/// `<model>.onnx` -> `<model>.onnx.json`
fn sidecar_path(model_path: &Path) -> Option<PathBuf> {
    let file_name = model_path.file_name()?.to_str()?;
    Some(model_path.with_file_name(format!("{}.json", file_name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_id_trims_whitespace() {
        let id = VoiceId::new("  en_US-amy-high \n").unwrap();
        assert_eq!(id.as_str(), "en_US-amy-high");
    }

    #[test]
    fn test_voice_id_rejects_blank() {
        assert!(VoiceId::new("   ").is_err());
        assert!(VoiceId::new("x".repeat(201)).is_err());
    }

    #[test]
    fn test_model_asset_discovers_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("en_GB-alba-high.onnx");
        std::fs::write(&model, b"model").unwrap();

        let id = VoiceId::new("en_GB-alba-high").unwrap();
        let asset = ModelAsset::discover(id.clone(), model.clone());
        assert_eq!(asset.voice_id().as_str(), "en_GB-alba-high");
        assert!(asset.config_path().is_none());

        std::fs::write(dir.path().join("en_GB-alba-high.onnx.json"), b"{}").unwrap();
        let asset = ModelAsset::discover(id, model);
        assert_eq!(
            asset.config_path(),
            Some(dir.path().join("en_GB-alba-high.onnx.json").as_path())
        );
    }
}
