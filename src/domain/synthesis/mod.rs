//! Synthesis Context - 合成限界上下文
//!
//! 职责:
//! - 合成请求的输入校验
//! - 产物标识与产物元数据
//! - 失败分类与单次请求的状态机

mod errors;
mod state;
mod value_objects;

pub use errors::{SynthesisError, SynthesisFailureKind};
pub use state::SynthesisState;
pub use value_objects::{ArtifactId, ArtifactIdError, SynthesisArtifact, SynthesisRequest};
