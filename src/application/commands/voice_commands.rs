//! Voice Commands

/// 重建音色索引
#[derive(Debug, Clone)]
pub struct RefreshVoices;
