//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::{
    // Command handlers
    RefreshVoicesHandler, SynthesisLimits, SynthesizeHandler,
    // Query handlers
    EngineStatusHandler, ListVoicesHandler, LocateArtifactHandler,
    // Ports
    ArtifactStorePort, SynthesisEnginePort, VoiceRegistryPort,
};

/// 状态接口展示的服务信息
#[derive(Debug, Clone)]
pub struct ServiceInfo {
    pub environment: String,
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
}

/// 应用状态
pub struct AppState {
    pub info: ServiceInfo,

    // ========== Command Handlers ==========
    pub synthesize_handler: SynthesizeHandler,
    pub refresh_voices_handler: RefreshVoicesHandler,

    // ========== Query Handlers ==========
    pub list_voices_handler: ListVoicesHandler,
    pub locate_artifact_handler: LocateArtifactHandler,
    pub engine_status_handler: EngineStatusHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        voice_registry: Arc<dyn VoiceRegistryPort>,
        engine: Arc<dyn SynthesisEnginePort>,
        artifact_store: Arc<dyn ArtifactStorePort>,
        limits: SynthesisLimits,
        info: ServiceInfo,
    ) -> Self {
        Self {
            info,

            // Command handlers
            synthesize_handler: SynthesizeHandler::new(
                voice_registry.clone(),
                engine.clone(),
                artifact_store.clone(),
                limits,
            ),
            refresh_voices_handler: RefreshVoicesHandler::new(voice_registry.clone()),

            // Query handlers
            list_voices_handler: ListVoicesHandler::new(voice_registry.clone()),
            locate_artifact_handler: LocateArtifactHandler::new(artifact_store),
            engine_status_handler: EngineStatusHandler::new(engine, voice_registry),
        }
    }
}
