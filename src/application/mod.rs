//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（VoiceRegistry、SynthesisEngine、ArtifactStore）
//! - commands: 合成与索引刷新命令及处理器
//! - queries: 音色列表、产物定位、引擎状态查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    handlers::{RefreshVoicesHandler, SynthesisLimits, SynthesizeHandler, SynthesizeResponse},
    RefreshVoices, Synthesize,
};

pub use error::ApplicationError;

pub use ports::{
    ArtifactStoreError, ArtifactStorePort, EngineError, EngineJob, EngineRun,
    SynthesisEnginePort, VoiceRegistryPort,
};

pub use queries::{
    handlers::{
        EngineStatus, EngineStatusHandler, ListVoicesHandler, LocateArtifactHandler,
        VoiceResponse,
    },
    GetEngineStatus, ListVoices, LocateArtifact,
};
