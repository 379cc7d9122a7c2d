//! Data Transfer Objects

use serde::{Deserialize, Serialize};

use crate::application::VoiceResponse;

// ============================================================================
// Synthesis DTOs
// ============================================================================

/// `POST /api/synthesize` 请求体
///
/// 字段缺失时为 None，由 handler 返回 400
#[derive(Debug, Deserialize)]
pub struct SynthesizeRequest {
    pub text: Option<String>,
    pub voice: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SynthesizeResponse {
    pub url: String,
}

// ============================================================================
// Voice DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct VoiceDto {
    pub id: String,
    pub name: String,
    pub lang: String,
    pub description: String,
    pub installed: bool,
}

impl From<VoiceResponse> for VoiceDto {
    fn from(v: VoiceResponse) -> Self {
        Self {
            id: v.id,
            name: v.name,
            lang: v.lang,
            description: v.description,
            installed: v.installed,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VoicesResponse {
    pub voices: Vec<VoiceDto>,
}

#[derive(Debug, Serialize)]
pub struct RefreshVoicesResponse {
    pub voices_indexed: usize,
}
