//! Engine Status Query Handler

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::ports::{SynthesisEnginePort, VoiceRegistryPort};
use crate::application::queries::GetEngineStatus;

/// 引擎状态
#[derive(Debug, Clone)]
pub struct EngineStatus {
    /// 启动时是否找到了可执行文件
    pub binary_found: bool,
    pub binary_path: Option<PathBuf>,
    /// 探测结果；未探测时等于 binary_found
    pub healthy: bool,
    pub voices_indexed: usize,
}

/// EngineStatus Handler
pub struct EngineStatusHandler {
    engine: Arc<dyn SynthesisEnginePort>,
    voice_registry: Arc<dyn VoiceRegistryPort>,
}

impl EngineStatusHandler {
    pub fn new(
        engine: Arc<dyn SynthesisEnginePort>,
        voice_registry: Arc<dyn VoiceRegistryPort>,
    ) -> Self {
        Self {
            engine,
            voice_registry,
        }
    }

    pub async fn handle(&self, query: GetEngineStatus) -> EngineStatus {
        let binary_path = self.engine.binary_path().map(|p| p.to_path_buf());
        let binary_found = binary_path.is_some();
        let healthy = if query.probe && binary_found {
            self.engine.health_check().await
        } else {
            binary_found
        };

        EngineStatus {
            binary_found,
            binary_path,
            healthy,
            voices_indexed: self.voice_registry.indexed_count().await,
        }
    }
}
