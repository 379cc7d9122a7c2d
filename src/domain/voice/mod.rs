//! Voice Context - 音色限界上下文
//!
//! 职责:
//! - 静态音色目录
//! - 音色 ID 到模型资产的映射
//! - Voice 查询

mod catalog;
mod errors;
mod value_objects;

pub use catalog::default_catalog;
pub use errors::VoiceError;
pub use value_objects::{ModelAsset, Voice, VoiceId, VoiceStatus};
