//! 应用层 - 命令（写操作）
//!
//! 合成会在输出目录写入新文件，索引刷新会替换内存中的音色索引

mod synthesize_commands;
mod voice_commands;

pub mod handlers;

pub use synthesize_commands::*;
pub use voice_commands::*;
