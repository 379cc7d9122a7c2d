//! Voice Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::VoiceRegistryPort;
use crate::application::queries::ListVoices;
use crate::domain::voice::VoiceStatus;

/// 音色响应
#[derive(Debug, Clone)]
pub struct VoiceResponse {
    pub id: String,
    pub name: String,
    pub lang: String,
    pub description: String,
    pub installed: bool,
}

impl From<VoiceStatus> for VoiceResponse {
    fn from(status: VoiceStatus) -> Self {
        Self {
            id: status.voice.id,
            name: status.voice.name,
            lang: status.voice.lang,
            description: status.voice.description,
            installed: status.installed,
        }
    }
}

/// ListVoices Handler
pub struct ListVoicesHandler {
    voice_registry: Arc<dyn VoiceRegistryPort>,
}

impl ListVoicesHandler {
    pub fn new(voice_registry: Arc<dyn VoiceRegistryPort>) -> Self {
        Self { voice_registry }
    }

    pub async fn handle(&self, _query: ListVoices) -> Result<Vec<VoiceResponse>, ApplicationError> {
        let voices = self.voice_registry.list_voices().await?;

        let installed = voices.iter().filter(|v| v.installed).count();
        if installed == 0 {
            tracing::warn!("No voice models found");
        }
        tracing::debug!(total = voices.len(), installed, "Returning voices");

        Ok(voices.into_iter().map(VoiceResponse::from).collect())
    }
}
