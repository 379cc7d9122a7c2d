//! Synthesis Context - 失败分类
//!
//! 所有失败对当前请求都是终态，本层不做自动重试

use std::time::Duration;
use thiserror::Error;

/// 合成失败
///
/// Display 输出不包含引擎 stderr，可以安全地返回给调用方
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// 输入不合法，不会调用引擎
    #[error("{0}")]
    ValidationRejected(String),

    /// 音色没有可用的模型资产
    #[error("Voice model '{0}' not found")]
    ModelNotFound(String),

    /// 引擎可执行文件无法启动
    #[error("Text-to-speech service is not available: {0}")]
    EngineUnavailable(String),

    /// 超时，子进程已被强制终止
    #[error("Speech synthesis timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// 引擎运行但以非零状态退出
    #[error("{}", engine_failure_message(.exit_code, .signal))]
    EngineFailure {
        exit_code: Option<i32>,
        signal: Option<i32>,
        stderr: String,
    },

    /// 引擎以 0 退出但没有产出有效文件
    #[error("Audio file generation failed: {0}")]
    OutputNotProduced(String),

    /// 产物目录读写失败
    #[error("Artifact storage error: {0}")]
    Storage(String),
}

fn engine_failure_message(exit_code: &Option<i32>, signal: &Option<i32>) -> String {
    match (exit_code, signal) {
        (Some(code), _) => format!("Piper failed (exit code {})", code),
        (None, Some(sig)) => format!("Piper was terminated by signal {}", sig),
        (None, None) => "Piper failed".to_string(),
    }
}

/// 失败类别（用于日志和 HTTP 状态映射）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisFailureKind {
    ValidationRejected,
    ModelNotFound,
    EngineUnavailable,
    Timeout,
    EngineFailure,
    OutputNotProduced,
    Storage,
}

impl SynthesisFailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationRejected => "validation_rejected",
            Self::ModelNotFound => "model_not_found",
            Self::EngineUnavailable => "engine_unavailable",
            Self::Timeout => "timeout",
            Self::EngineFailure => "engine_failure",
            Self::OutputNotProduced => "output_not_produced",
            Self::Storage => "storage",
        }
    }
}

impl SynthesisError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationRejected(message.into())
    }

    pub fn kind(&self) -> SynthesisFailureKind {
        match self {
            Self::ValidationRejected(_) => SynthesisFailureKind::ValidationRejected,
            Self::ModelNotFound(_) => SynthesisFailureKind::ModelNotFound,
            Self::EngineUnavailable(_) => SynthesisFailureKind::EngineUnavailable,
            Self::Timeout(_) => SynthesisFailureKind::Timeout,
            Self::EngineFailure { .. } => SynthesisFailureKind::EngineFailure,
            Self::OutputNotProduced(_) => SynthesisFailureKind::OutputNotProduced,
            Self::Storage(_) => SynthesisFailureKind::Storage,
        }
    }
}
