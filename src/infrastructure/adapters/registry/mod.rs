//! Registry Adapter - 音色注册表实现

mod fs_voice_registry;

pub use fs_voice_registry::{FsVoiceRegistry, FsVoiceRegistryConfig};
