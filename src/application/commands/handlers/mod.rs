//! Command Handlers 实现

mod synthesize_handlers;
mod voice_handlers;

pub use synthesize_handlers::*;
pub use voice_handlers::*;
