//! Voice Command Handlers

use std::sync::Arc;

use crate::application::commands::RefreshVoices;
use crate::application::error::ApplicationError;
use crate::application::ports::VoiceRegistryPort;

/// RefreshVoices Handler
pub struct RefreshVoicesHandler {
    voice_registry: Arc<dyn VoiceRegistryPort>,
}

impl RefreshVoicesHandler {
    pub fn new(voice_registry: Arc<dyn VoiceRegistryPort>) -> Self {
        Self { voice_registry }
    }

    /// 返回重建后的模型数量
    pub async fn handle(&self, _command: RefreshVoices) -> Result<usize, ApplicationError> {
        let count = self.voice_registry.refresh().await?;
        tracing::info!(voices_indexed = count, "Voice index refreshed");
        Ok(count)
    }
}
