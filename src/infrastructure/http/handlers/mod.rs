//! HTTP Handlers

mod health;
mod output;
mod synthesize;
mod voice;

pub use health::*;
pub use output::*;
pub use synthesize::*;
pub use voice::*;
