//! 应用层 - 查询（读操作）
//!
//! 所有查询均不修改文件系统

mod artifact_queries;
mod engine_queries;
mod voice_queries;

pub mod handlers;

pub use artifact_queries::*;
pub use engine_queries::*;
pub use voice_queries::*;
