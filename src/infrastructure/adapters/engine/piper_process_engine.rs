//! Piper Process Engine - 以子进程方式调用 piper
//!
//! 实现 SynthesisEnginePort trait
//!
//! 调用方式:
//! `piper -m <model> -f <output> --data-dir <root> --download-dir <root>`
//! 文本以 UTF-8 写入 stdin 后关闭；stderr 与等待并发读取，避免管道写满导致死锁。
//! 超过时间预算时强制终止进程。

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};

use super::binary_locator::probe_binary;
use crate::application::ports::{EngineError, EngineJob, EngineRun, SynthesisEnginePort};
use crate::domain::synthesis::SynthesisState;

/// 保留的 stderr 字节上限，超出部分读取后丢弃
const MAX_STDERR_BYTES: usize = 64 * 1024;

/// Piper 引擎配置
#[derive(Debug, Clone)]
pub struct PiperEngineConfig {
    /// 可执行文件路径；None 表示启动时未找到
    pub binary: Option<PathBuf>,
    /// 共享资产目录（--data-dir / --download-dir）
    pub data_dir: PathBuf,
    /// 单次合成的时间预算
    pub timeout: Duration,
    /// 健康检查时 `--help` 的超时
    pub probe_timeout: Duration,
}

impl Default for PiperEngineConfig {
    fn default() -> Self {
        Self {
            binary: None,
            data_dir: PathBuf::from("piper_data"),
            timeout: Duration::from_secs(60),
            probe_timeout: Duration::from_secs(5),
        }
    }
}

/// Piper 子进程引擎
///
/// 不持有任何跨调用状态，每次调用独立启动进程
pub struct PiperProcessEngine {
    config: PiperEngineConfig,
}

impl PiperProcessEngine {
    pub fn new(config: PiperEngineConfig) -> Self {
        Self { config }
    }

    fn command(&self, binary: &Path, job: &EngineJob) -> Command {
        let mut cmd = Command::new(binary);
        cmd.arg("-m")
            .arg(&job.model_path)
            .arg("-f")
            .arg(&job.output_path)
            .arg("--data-dir")
            .arg(&self.config.data_dir)
            .arg("--download-dir")
            .arg(&self.config.data_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    /// 超时后终止并回收子进程
    async fn terminate(child: &mut Child) {
        if let Err(e) = child.kill().await {
            tracing::warn!(error = %e, "Failed to kill piper process");
        }
    }
}

#[async_trait]
impl SynthesisEnginePort for PiperProcessEngine {
    async fn run(&self, job: EngineJob) -> Result<EngineRun, EngineError> {
        let binary = self
            .config
            .binary
            .as_deref()
            .ok_or_else(|| EngineError::Unavailable("Piper binary not found".to_string()))?;

        let started = Instant::now();
        let mut child = self.command(binary, &job).spawn().map_err(|e| {
            tracing::error!(binary = %binary.display(), error = %e, "Failed to start piper");
            EngineError::Unavailable(format!("failed to start {}: {}", binary.display(), e))
        })?;

        tracing::debug!(
            pid = ?child.id(),
            state = SynthesisState::AwaitingCompletion.as_str(),
            output = %job.output_path.display(),
            "Piper process spawned"
        );

        let stdin = child.stdin.take();
        let text = job.text.into_bytes();
        let mut writer = tokio::spawn(async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(&text).await?;
                stdin.flush().await?;
                // drop 时关闭 stdin，piper 读到 EOF 后开始合成
            }
            Ok::<(), std::io::Error>(())
        });

        let reader = tokio::spawn(drain_stderr(child.stderr.take()));

        let waited = tokio::time::timeout(self.config.timeout, child.wait()).await;
        let status = match waited {
            Ok(Ok(status)) => status,
            Ok(Err(e)) => {
                Self::terminate(&mut child).await;
                writer.abort();
                reader.abort();
                return Err(EngineError::Io(format!("failed to wait for piper: {}", e)));
            }
            Err(_) => {
                tracing::warn!(
                    pid = ?child.id(),
                    timeout_ms = self.config.timeout.as_millis() as u64,
                    "Piper synthesis timed out, killing process"
                );
                Self::terminate(&mut child).await;
                writer.abort();
                reader.abort();
                return Err(EngineError::Timeout(self.config.timeout));
            }
        };

        // 进程已退出；stdin/stderr 若被孙进程占用，最多再等到时间预算用完
        let remaining = self.config.timeout.saturating_sub(started.elapsed());
        match tokio::time::timeout(remaining, &mut writer).await {
            Ok(Ok(Err(e))) if e.kind() != ErrorKind::BrokenPipe => {
                tracing::debug!(error = %e, "Failed to write text to piper stdin");
            }
            Err(_) => {
                tracing::warn!("Piper stdin still held after exit, abandoning writer");
                writer.abort();
            }
            _ => {}
        }

        let remaining = self.config.timeout.saturating_sub(started.elapsed());
        let stderr = match tokio::time::timeout(remaining, reader).await {
            Ok(Ok(stderr)) => stderr,
            _ => String::new(),
        };

        let elapsed = started.elapsed();
        if status.success() {
            tracing::debug!(elapsed_ms = elapsed.as_millis() as u64, "Piper exited successfully");
            Ok(EngineRun { elapsed, stderr })
        } else {
            Err(EngineError::Exited {
                exit_code: status.code(),
                signal: exit_signal(&status),
                stderr,
            })
        }
    }

    fn binary_path(&self) -> Option<&Path> {
        self.config.binary.as_deref()
    }

    async fn health_check(&self) -> bool {
        match self.config.binary.as_deref() {
            Some(binary) => probe_binary(binary, self.config.probe_timeout).await,
            None => false,
        }
    }
}

/// 读完整个 stderr，只保留前 MAX_STDERR_BYTES 字节
async fn drain_stderr<R>(stderr: Option<R>) -> String
where
    R: AsyncRead + Unpin,
{
    let Some(mut stderr) = stderr else {
        return String::new();
    };

    let mut kept = Vec::new();
    let mut buf = [0u8; 8192];
    loop {
        match stderr.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                let room = MAX_STDERR_BYTES.saturating_sub(kept.len());
                kept.extend_from_slice(&buf[..n.min(room)]);
            }
        }
    }

    String::from_utf8_lossy(&kept).trim_end().to_string()
}

#[cfg(unix)]
fn exit_signal(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn exit_signal(_status: &ExitStatus) -> Option<i32> {
    None
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::{tempdir, TempDir};

    fn write_script(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("piper");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn engine(dir: &TempDir, body: &str, timeout: Duration) -> PiperProcessEngine {
        let binary = write_script(dir.path(), body);
        PiperProcessEngine::new(PiperEngineConfig {
            binary: Some(binary),
            data_dir: dir.path().to_path_buf(),
            timeout,
            probe_timeout: Duration::from_secs(5),
        })
    }

    fn job(dir: &TempDir, text: &str) -> EngineJob {
        EngineJob {
            text: text.to_string(),
            model_path: dir.path().join("en_US-lessac-high.onnx"),
            output_path: dir.path().join("out.wav"),
        }
    }

    #[tokio::test]
    async fn test_passes_arguments_and_stdin() {
        let dir = tempdir().unwrap();
        let engine = engine(
            &dir,
            r#"[ "$1" = "-m" ] && [ "$3" = "-f" ] && [ "$5" = "--data-dir" ] && [ "$7" = "--download-dir" ] || exit 3
[ "$6" = "$8" ] || exit 4
cat > "$4""#,
            Duration::from_secs(10),
        );

        let job = job(&dir, "Hello world");
        let output = job.output_path.clone();
        engine.run(job).await.unwrap();

        assert_eq!(std::fs::read_to_string(output).unwrap(), "Hello world");
    }

    #[tokio::test]
    async fn test_non_zero_exit_captures_stderr() {
        let dir = tempdir().unwrap();
        let engine = engine(&dir, "echo 'model load failed' >&2\nexit 7", Duration::from_secs(10));

        match engine.run(job(&dir, "hi")).await {
            Err(EngineError::Exited {
                exit_code, stderr, ..
            }) => {
                assert_eq!(exit_code, Some(7));
                assert_eq!(stderr, "model load failed");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_timeout_kills_process() {
        let dir = tempdir().unwrap();
        let engine = engine(&dir, "exec sleep 30", Duration::from_millis(300));

        let started = Instant::now();
        let result = engine.run(job(&dir, "hi")).await;

        assert!(matches!(result, Err(EngineError::Timeout(_))));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_large_stderr_does_not_deadlock() {
        let dir = tempdir().unwrap();
        let engine = engine(
            &dir,
            "head -c 300000 /dev/zero | tr '\\0' 'x' >&2\ncat > \"$4\"",
            Duration::from_secs(10),
        );

        let run = engine.run(job(&dir, "hi")).await.unwrap();
        assert_eq!(run.stderr.len(), MAX_STDERR_BYTES);
    }

    #[tokio::test]
    async fn test_engine_that_ignores_stdin_still_succeeds() {
        let dir = tempdir().unwrap();
        let engine = engine(&dir, "printf RIFF > \"$4\"", Duration::from_secs(10));

        let text = "a".repeat(200_000);
        assert!(engine.run(job(&dir, &text)).await.is_ok());
    }

    #[tokio::test]
    async fn test_orphaned_stdin_holder_does_not_outlast_budget() {
        let dir = tempdir().unwrap();
        // 孙进程持有 stdin 但从不读取，主进程立即退出
        let engine = engine(
            &dir,
            "printf RIFF > \"$4\"\nexec 3<&0\nsleep 5 <&3 >/dev/null 2>&1 &\nexit 0",
            Duration::from_secs(1),
        );

        let text = "a".repeat(512 * 1024);
        let started = Instant::now();
        assert!(engine.run(job(&dir, &text)).await.is_ok());
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_missing_binary_is_unavailable() {
        let dir = tempdir().unwrap();
        let engine = PiperProcessEngine::new(PiperEngineConfig {
            binary: Some(dir.path().join("does-not-exist")),
            data_dir: dir.path().to_path_buf(),
            ..Default::default()
        });

        assert!(matches!(
            engine.run(job(&dir, "hi")).await,
            Err(EngineError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_unconfigured_binary_is_unavailable() {
        let dir = tempdir().unwrap();
        let engine = PiperProcessEngine::new(PiperEngineConfig::default());

        assert!(matches!(
            engine.run(job(&dir, "hi")).await,
            Err(EngineError::Unavailable(_))
        ));
        assert!(!engine.health_check().await);
        assert!(engine.binary_path().is_none());
    }

    #[tokio::test]
    async fn test_health_check_probes_binary() {
        let dir = tempdir().unwrap();
        let engine = engine(&dir, "exit 0", Duration::from_secs(10));
        assert!(engine.health_check().await);
    }
}
