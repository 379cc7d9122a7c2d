//! Synthesis Context - 单次请求状态机
//!
//! Validating -> Invoking -> AwaitingCompletion -> Verifying -> Succeeded
//! 任意阶段均可能进入终态：ValidationRejected / Unavailable / TimedOut / Failed

use super::SynthesisFailureKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisState {
    Validating,
    Invoking,
    AwaitingCompletion,
    Verifying,
    Succeeded,
    ValidationRejected,
    Unavailable,
    TimedOut,
    Failed,
}

impl SynthesisState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validating => "validating",
            Self::Invoking => "invoking",
            Self::AwaitingCompletion => "awaiting_completion",
            Self::Verifying => "verifying",
            Self::Succeeded => "succeeded",
            Self::ValidationRejected => "validation_rejected",
            Self::Unavailable => "unavailable",
            Self::TimedOut => "timed_out",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Succeeded
                | Self::ValidationRejected
                | Self::Unavailable
                | Self::TimedOut
                | Self::Failed
        )
    }

    /// 失败分类对应的终态
    pub fn terminal_for(kind: SynthesisFailureKind) -> Self {
        match kind {
            SynthesisFailureKind::ValidationRejected | SynthesisFailureKind::ModelNotFound => {
                Self::ValidationRejected
            }
            SynthesisFailureKind::EngineUnavailable => Self::Unavailable,
            SynthesisFailureKind::Timeout => Self::TimedOut,
            SynthesisFailureKind::EngineFailure
            | SynthesisFailureKind::OutputNotProduced
            | SynthesisFailureKind::Storage => Self::Failed,
        }
    }
}
