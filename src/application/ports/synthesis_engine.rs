//! Synthesis Engine Port - 外部 TTS 引擎抽象
//!
//! 每次调用都是独立的子进程，调用之间不共享任何引擎状态

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// 引擎错误
#[derive(Debug, Error)]
pub enum EngineError {
    /// 可执行文件缺失或无法启动
    #[error("Engine unavailable: {0}")]
    Unavailable(String),

    /// 超过时间预算，进程已被终止
    #[error("Engine timed out after {0:?}")]
    Timeout(Duration),

    /// 进程以非零状态退出（或被信号终止）
    #[error("Engine exited with code {exit_code:?} (signal {signal:?})")]
    Exited {
        exit_code: Option<i32>,
        signal: Option<i32>,
        stderr: String,
    },

    /// 与子进程交互时的 IO 错误
    #[error("Engine IO error: {0}")]
    Io(String),
}

/// 单次引擎调用
#[derive(Debug, Clone)]
pub struct EngineJob {
    /// 已去除首尾空白的文本，通过 stdin 以 UTF-8 写入
    pub text: String,
    /// 模型文件路径
    pub model_path: PathBuf,
    /// 输出文件路径（每次调用唯一）
    pub output_path: PathBuf,
}

/// 引擎以 0 退出后的运行信息
#[derive(Debug, Clone)]
pub struct EngineRun {
    pub elapsed: Duration,
    /// 截断后的 stderr（仅用于诊断日志）
    pub stderr: String,
}

/// Synthesis Engine Port
#[async_trait]
pub trait SynthesisEnginePort: Send + Sync {
    /// 运行一次合成，等待进程结束
    ///
    /// 返回 Ok 仅表示进程以 0 退出，输出文件是否有效由调用方校验
    async fn run(&self, job: EngineJob) -> Result<EngineRun, EngineError>;

    /// 引擎可执行文件路径（未找到时为 None）
    fn binary_path(&self) -> Option<&Path>;

    /// 检查引擎是否可以正常启动
    async fn health_check(&self) -> bool {
        self.binary_path().is_some()
    }
}
