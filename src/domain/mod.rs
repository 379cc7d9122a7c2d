//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Voice Context: 音色目录与模型资产
//! - Synthesis Context: 合成请求、产物与失败分类

pub mod synthesis;
pub mod voice;
