//! Synthesize Commands

/// 合成命令（原始输入，尚未校验）
#[derive(Debug, Clone)]
pub struct Synthesize {
    pub text: String,
    pub voice: String,
}
