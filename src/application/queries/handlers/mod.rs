//! Query Handlers 实现

mod artifact_handlers;
mod engine_handlers;
mod voice_handlers;

pub use artifact_handlers::*;
pub use engine_handlers::*;
pub use voice_handlers::*;
