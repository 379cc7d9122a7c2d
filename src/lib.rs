//! Piperbox - 基于 Piper 的文本转语音 HTTP 服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Voice Context: 音色目录与模型资产
//! - Synthesis Context: 合成请求、产物与状态机
//!
//! 应用层 (application/):
//! - Ports: 端口定义（VoiceRegistry, SynthesisEngine, ArtifactStore）
//! - Commands: 合成、索引刷新
//! - Queries: 音色列表、产物定位、引擎状态
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Adapters: piper 子进程引擎、文件系统音色注册表、产物目录

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
