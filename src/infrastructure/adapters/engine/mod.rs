//! Engine Adapter - Piper 子进程引擎

mod binary_locator;
mod piper_process_engine;

pub use binary_locator::{locate_engine_binary, probe_binary, DEFAULT_ENGINE_CANDIDATES};
pub use piper_process_engine::{PiperEngineConfig, PiperProcessEngine};
