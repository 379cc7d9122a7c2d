//! Voice Registry Port - 音色解析抽象
//!
//! 只读：实现不得修改资产目录

use async_trait::async_trait;

use crate::domain::voice::{ModelAsset, VoiceError, VoiceId, VoiceStatus};

/// Voice Registry Port
#[async_trait]
pub trait VoiceRegistryPort: Send + Sync {
    /// 按目录顺序列出所有音色，安装状态每次调用重新计算
    async fn list_voices(&self) -> Result<Vec<VoiceStatus>, VoiceError>;

    /// 将音色 ID 解析为模型资产
    ///
    /// 幂等且无副作用；找不到时返回 `VoiceError::NotFound`
    async fn resolve(&self, voice_id: &VoiceId) -> Result<ModelAsset, VoiceError>;

    /// 显式失效：重新扫描资产目录，返回已索引的模型数量
    async fn refresh(&self) -> Result<usize, VoiceError>;

    /// 当前索引中的模型数量
    async fn indexed_count(&self) -> usize;
}
