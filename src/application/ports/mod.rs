//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod artifact_store;
mod synthesis_engine;
mod voice_registry;

pub use artifact_store::{ArtifactStoreError, ArtifactStorePort};
pub use synthesis_engine::{EngineError, EngineJob, EngineRun, SynthesisEnginePort};
pub use voice_registry::VoiceRegistryPort;
