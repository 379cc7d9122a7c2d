//! Synthesize Command Handler - 合成编排
//!
//! 单次请求流程:
//! 校验输入 -> 解析音色 -> 复核模型文件 -> 获取并发许可 -> 分配输出路径
//! -> 调用引擎 -> 校验输出文件 -> 发布产物
//!
//! 失败即终止，不做自动重试；分配之后的任何失败都会清理残留输出

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;

use crate::application::commands::Synthesize;
use crate::application::error::ApplicationError;
use crate::application::ports::{
    ArtifactStorePort, EngineError, EngineJob, SynthesisEnginePort, VoiceRegistryPort,
};
use crate::domain::synthesis::{
    ArtifactId, SynthesisArtifact, SynthesisError, SynthesisFailureKind, SynthesisRequest,
    SynthesisState,
};
use crate::domain::voice::VoiceError;

/// 合成限制
#[derive(Debug, Clone)]
pub struct SynthesisLimits {
    /// 文本最大字符数（去除首尾空白后）
    pub max_text_chars: usize,
    /// 同时运行的引擎进程上限
    pub max_concurrent: usize,
}

impl Default for SynthesisLimits {
    fn default() -> Self {
        Self {
            max_text_chars: 5000,
            max_concurrent: 4,
        }
    }
}

/// 合成响应
#[derive(Debug, Clone)]
pub struct SynthesizeResponse {
    pub artifact_id: String,
    pub file_name: String,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
}

impl From<SynthesisArtifact> for SynthesizeResponse {
    fn from(artifact: SynthesisArtifact) -> Self {
        Self {
            file_name: artifact.file_name(),
            artifact_id: artifact.id.to_string(),
            size_bytes: artifact.size_bytes,
            created_at: artifact.created_at,
        }
    }
}

/// Synthesize Handler
pub struct SynthesizeHandler {
    voice_registry: Arc<dyn VoiceRegistryPort>,
    engine: Arc<dyn SynthesisEnginePort>,
    artifact_store: Arc<dyn ArtifactStorePort>,
    limits: SynthesisLimits,
    permits: Arc<Semaphore>,
}

impl SynthesizeHandler {
    pub fn new(
        voice_registry: Arc<dyn VoiceRegistryPort>,
        engine: Arc<dyn SynthesisEnginePort>,
        artifact_store: Arc<dyn ArtifactStorePort>,
        limits: SynthesisLimits,
    ) -> Self {
        let permits = Arc::new(Semaphore::new(limits.max_concurrent.max(1)));
        Self {
            voice_registry,
            engine,
            artifact_store,
            limits,
            permits,
        }
    }

    pub async fn handle(&self, command: Synthesize) -> Result<SynthesizeResponse, ApplicationError> {
        let started = Instant::now();
        let voice = command.voice.trim();
        transition(voice, SynthesisState::Validating);

        let request = match SynthesisRequest::new(&command.text, voice, self.limits.max_text_chars)
        {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(
                    voice_id = %voice,
                    text_len = command.text.trim().chars().count(),
                    kind = e.kind().as_str(),
                    error = %e,
                    "Synthesis request rejected"
                );
                transition(voice, SynthesisState::ValidationRejected);
                return Err(e.into());
            }
        };

        tracing::info!(
            voice_id = %request.voice_id(),
            text_len = request.text_len(),
            "Synthesizing text"
        );

        match self.synthesize(&request).await {
            Ok(artifact) => {
                transition(voice, SynthesisState::Succeeded);
                tracing::info!(
                    voice_id = %request.voice_id(),
                    artifact_id = %artifact.id,
                    size_bytes = artifact.size_bytes,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Audio file created successfully"
                );
                Ok(SynthesizeResponse::from(artifact))
            }
            Err(e) => {
                transition(voice, SynthesisState::terminal_for(e.kind()));
                log_failure(&request, &e, started);
                Err(e.into())
            }
        }
    }

    async fn synthesize(
        &self,
        request: &SynthesisRequest,
    ) -> Result<SynthesisArtifact, SynthesisError> {
        let voice_id = request.voice_id();

        let asset = self
            .voice_registry
            .resolve(voice_id)
            .await
            .map_err(|e| match e {
                VoiceError::NotFound(id) => SynthesisError::ModelNotFound(id),
                VoiceError::InvalidId(_) => SynthesisError::ModelNotFound(voice_id.to_string()),
                VoiceError::ScanFailed(msg) => SynthesisError::Storage(msg),
            })?;

        // 解析与调用之间模型文件可能被移除
        match tokio::fs::metadata(asset.model_path()).await {
            Ok(meta) if meta.is_file() => {}
            _ => return Err(SynthesisError::ModelNotFound(voice_id.to_string())),
        }

        tracing::debug!(
            voice_id = %asset.voice_id(),
            model = %asset.model_path().display(),
            has_config = asset.config_path().is_some(),
            "Using model"
        );

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| SynthesisError::EngineUnavailable("synthesis queue closed".to_string()))?;

        let (artifact_id, output_path) = self.artifact_store.allocate();
        transition(voice_id.as_str(), SynthesisState::Invoking);

        let job = EngineJob {
            text: request.text().to_string(),
            model_path: asset.model_path().to_path_buf(),
            output_path: output_path.clone(),
        };

        let run = match self.engine.run(job).await {
            Ok(run) => run,
            Err(e) => {
                self.artifact_store.discard(&artifact_id).await;
                return Err(map_engine_error(e));
            }
        };

        transition(voice_id.as_str(), SynthesisState::Verifying);
        tracing::debug!(
            artifact_id = %artifact_id,
            engine_ms = run.elapsed.as_millis() as u64,
            stderr = %run.stderr,
            "Engine finished"
        );

        // 引擎声称成功，但必须确认文件存在且非空
        let size = tokio::fs::metadata(&output_path)
            .await
            .map(|m| m.len())
            .unwrap_or(0);
        if size == 0 {
            self.artifact_store.discard(&artifact_id).await;
            return Err(SynthesisError::OutputNotProduced(format!(
                "engine exited successfully but wrote no output for {}",
                artifact_id
            )));
        }

        self.publish(&artifact_id).await
    }

    async fn publish(&self, artifact_id: &ArtifactId) -> Result<SynthesisArtifact, SynthesisError> {
        match self.artifact_store.publish(artifact_id).await {
            Ok(artifact) => Ok(artifact),
            Err(e) => {
                self.artifact_store.discard(artifact_id).await;
                Err(SynthesisError::Storage(e.to_string()))
            }
        }
    }
}

fn transition(voice_id: &str, state: SynthesisState) {
    tracing::debug!(
        voice_id = %voice_id,
        state = state.as_str(),
        terminal = state.is_terminal(),
        "Synthesis state changed"
    );
}

fn map_engine_error(err: EngineError) -> SynthesisError {
    match err {
        EngineError::Unavailable(msg) => SynthesisError::EngineUnavailable(msg),
        EngineError::Timeout(after) => SynthesisError::Timeout(after),
        EngineError::Exited {
            exit_code,
            signal,
            stderr,
        } => SynthesisError::EngineFailure {
            exit_code,
            signal,
            stderr,
        },
        EngineError::Io(msg) => SynthesisError::EngineFailure {
            exit_code: None,
            signal: None,
            stderr: msg,
        },
    }
}

/// 失败日志：只记录 ID 与长度，不记录文本内容
fn log_failure(request: &SynthesisRequest, err: &SynthesisError, started: Instant) {
    let elapsed_ms = started.elapsed().as_millis() as u64;
    let kind = err.kind();

    match err {
        SynthesisError::EngineFailure {
            exit_code,
            signal,
            stderr,
        } => {
            tracing::error!(
                voice_id = %request.voice_id(),
                text_len = request.text_len(),
                kind = kind.as_str(),
                exit_code = ?exit_code,
                signal = ?signal,
                elapsed_ms,
                stderr = %stderr,
                "Piper synthesis failed"
            );
        }
        _ if matches!(kind, SynthesisFailureKind::ModelNotFound) => {
            tracing::warn!(
                voice_id = %request.voice_id(),
                text_len = request.text_len(),
                kind = kind.as_str(),
                "Voice model not found"
            );
        }
        _ => {
            tracing::error!(
                voice_id = %request.voice_id(),
                text_len = request.text_len(),
                kind = kind.as_str(),
                elapsed_ms,
                error = %err,
                "Piper synthesis failed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tempfile::TempDir;

    use crate::application::ports::EngineRun;
    use crate::domain::voice::{ModelAsset, VoiceId, VoiceStatus};
    use crate::infrastructure::adapters::FileArtifactStore;

    /// 固定映射的注册表
    struct StaticRegistry {
        assets: HashMap<String, PathBuf>,
    }

    #[async_trait]
    impl VoiceRegistryPort for StaticRegistry {
        async fn list_voices(&self) -> Result<Vec<VoiceStatus>, VoiceError> {
            Ok(Vec::new())
        }

        async fn resolve(&self, voice_id: &VoiceId) -> Result<ModelAsset, VoiceError> {
            self.assets
                .get(voice_id.as_str())
                .map(|p| ModelAsset::discover(voice_id.clone(), p.clone()))
                .ok_or_else(|| VoiceError::NotFound(voice_id.to_string()))
        }

        async fn refresh(&self) -> Result<usize, VoiceError> {
            Ok(self.assets.len())
        }

        async fn indexed_count(&self) -> usize {
            self.assets.len()
        }
    }

    #[derive(Clone, Copy)]
    enum Behavior {
        WriteText,
        WriteNothing,
        PartialThenTimeout,
        ExitNonZero,
        Unavailable,
    }

    struct FakeEngine {
        behavior: Behavior,
        delay: Duration,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        outputs: std::sync::Mutex<Vec<PathBuf>>,
    }

    impl FakeEngine {
        fn new(behavior: Behavior) -> Self {
            Self {
                behavior,
                delay: Duration::from_millis(0),
                calls: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
                outputs: std::sync::Mutex::new(Vec::new()),
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    #[async_trait]
    impl SynthesisEnginePort for FakeEngine {
        async fn run(&self, job: EngineJob) -> Result<EngineRun, EngineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            self.outputs.lock().unwrap().push(job.output_path.clone());

            tokio::time::sleep(self.delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            match self.behavior {
                Behavior::WriteText => {
                    tokio::fs::write(&job.output_path, job.text.as_bytes())
                        .await
                        .unwrap();
                    Ok(EngineRun {
                        elapsed: self.delay,
                        stderr: String::new(),
                    })
                }
                Behavior::WriteNothing => Ok(EngineRun {
                    elapsed: self.delay,
                    stderr: String::new(),
                }),
                Behavior::PartialThenTimeout => {
                    tokio::fs::write(&job.output_path, b"RIFF").await.unwrap();
                    Err(EngineError::Timeout(Duration::from_secs(60)))
                }
                Behavior::ExitNonZero => Err(EngineError::Exited {
                    exit_code: Some(1),
                    signal: None,
                    stderr: "model load failed".to_string(),
                }),
                Behavior::Unavailable => {
                    Err(EngineError::Unavailable("piper binary not found".to_string()))
                }
            }
        }

        fn binary_path(&self) -> Option<&Path> {
            None
        }
    }

    struct Fixture {
        _assets: TempDir,
        outputs: TempDir,
        engine: Arc<FakeEngine>,
        handler: SynthesizeHandler,
    }

    async fn fixture(engine: FakeEngine, limits: SynthesisLimits) -> Fixture {
        let assets = tempfile::tempdir().unwrap();
        let outputs = tempfile::tempdir().unwrap();

        let model = assets.path().join("en_US-lessac-high.onnx");
        std::fs::write(&model, b"model").unwrap();
        let mut map = HashMap::new();
        map.insert("en_US-lessac-high".to_string(), model);
        // 已索引但文件不存在
        map.insert(
            "en_US-ghost-high".to_string(),
            assets.path().join("en_US-ghost-high.onnx"),
        );

        let engine = Arc::new(engine);
        let store = FileArtifactStore::new(outputs.path()).await.unwrap();
        let handler = SynthesizeHandler::new(
            Arc::new(StaticRegistry { assets: map }),
            engine.clone(),
            Arc::new(store),
            limits,
        );

        Fixture {
            _assets: assets,
            outputs,
            engine,
            handler,
        }
    }

    fn command(text: &str, voice: &str) -> Synthesize {
        Synthesize {
            text: text.to_string(),
            voice: voice.to_string(),
        }
    }

    fn output_files(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    fn synthesis_kind(err: ApplicationError) -> SynthesisFailureKind {
        match err {
            ApplicationError::Synthesis(e) => e.kind(),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_success_publishes_non_empty_artifact() {
        let f = fixture(FakeEngine::new(Behavior::WriteText), SynthesisLimits::default()).await;

        let resp = f
            .handler
            .handle(command("  Hello world  ", "en_US-lessac-high"))
            .await
            .unwrap();

        assert_eq!(resp.artifact_id.len(), 32);
        assert_eq!(resp.file_name, format!("{}.wav", resp.artifact_id));
        assert_eq!(resp.size_bytes, "Hello world".len() as u64);

        let path = f.outputs.path().join(&resp.file_name);
        assert_eq!(std::fs::read(path).unwrap(), b"Hello world");
    }

    #[tokio::test]
    async fn test_text_over_limit_never_invokes_engine() {
        let f = fixture(FakeEngine::new(Behavior::WriteText), SynthesisLimits::default()).await;

        let err = f
            .handler
            .handle(command(&"a".repeat(5001), "en_US-lessac-high"))
            .await
            .unwrap_err();

        assert_eq!(synthesis_kind(err), SynthesisFailureKind::ValidationRejected);
        assert_eq!(f.engine.calls.load(Ordering::SeqCst), 0);
        assert_eq!(output_files(f.outputs.path()), 0);
    }

    #[tokio::test]
    async fn test_unknown_voice_is_model_not_found() {
        let f = fixture(FakeEngine::new(Behavior::WriteText), SynthesisLimits::default()).await;

        let err = f
            .handler
            .handle(command("Hello", "nonexistent-voice"))
            .await
            .unwrap_err();

        assert_eq!(synthesis_kind(err), SynthesisFailureKind::ModelNotFound);
        assert_eq!(f.engine.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_vanished_model_is_model_not_found() {
        let f = fixture(FakeEngine::new(Behavior::WriteText), SynthesisLimits::default()).await;

        let err = f
            .handler
            .handle(command("Hello", "en_US-ghost-high"))
            .await
            .unwrap_err();

        assert_eq!(synthesis_kind(err), SynthesisFailureKind::ModelNotFound);
        assert_eq!(f.engine.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_timeout_discards_partial_output() {
        let f = fixture(
            FakeEngine::new(Behavior::PartialThenTimeout),
            SynthesisLimits::default(),
        )
        .await;

        let err = f
            .handler
            .handle(command("Hello", "en_US-lessac-high"))
            .await
            .unwrap_err();

        assert_eq!(synthesis_kind(err), SynthesisFailureKind::Timeout);
        assert_eq!(output_files(f.outputs.path()), 0);
    }

    #[tokio::test]
    async fn test_exit_zero_without_output_is_output_not_produced() {
        let f = fixture(FakeEngine::new(Behavior::WriteNothing), SynthesisLimits::default()).await;

        let err = f
            .handler
            .handle(command("Hello", "en_US-lessac-high"))
            .await
            .unwrap_err();

        assert_eq!(synthesis_kind(err), SynthesisFailureKind::OutputNotProduced);
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_engine_failure() {
        let f = fixture(FakeEngine::new(Behavior::ExitNonZero), SynthesisLimits::default()).await;

        let err = f
            .handler
            .handle(command("Hello", "en_US-lessac-high"))
            .await
            .unwrap_err();

        match err {
            ApplicationError::Synthesis(SynthesisError::EngineFailure { exit_code, .. }) => {
                assert_eq!(exit_code, Some(1));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(output_files(f.outputs.path()), 0);
    }

    #[tokio::test]
    async fn test_unavailable_engine() {
        let f = fixture(FakeEngine::new(Behavior::Unavailable), SynthesisLimits::default()).await;

        let err = f
            .handler
            .handle(command("Hello", "en_US-lessac-high"))
            .await
            .unwrap_err();

        assert_eq!(synthesis_kind(err), SynthesisFailureKind::EngineUnavailable);
    }

    #[tokio::test]
    async fn test_concurrent_requests_use_distinct_paths() {
        let engine = FakeEngine::new(Behavior::WriteText).with_delay(Duration::from_millis(50));
        let f = fixture(engine, SynthesisLimits::default()).await;

        let (a, b) = tokio::join!(
            f.handler.handle(command("first", "en_US-lessac-high")),
            f.handler.handle(command("second", "en_US-lessac-high")),
        );
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_ne!(a.artifact_id, b.artifact_id);
        let outputs = f.engine.outputs.lock().unwrap().clone();
        assert_eq!(outputs.len(), 2);
        assert_ne!(outputs[0], outputs[1]);
        assert_eq!(output_files(f.outputs.path()), 2);
    }

    #[tokio::test]
    async fn test_concurrency_ceiling_bounds_engine_processes() {
        let engine = FakeEngine::new(Behavior::WriteText).with_delay(Duration::from_millis(30));
        let limits = SynthesisLimits {
            max_text_chars: 5000,
            max_concurrent: 1,
        };
        let f = fixture(engine, limits).await;

        let (a, b, c) = tokio::join!(
            f.handler.handle(command("one", "en_US-lessac-high")),
            f.handler.handle(command("two", "en_US-lessac-high")),
            f.handler.handle(command("three", "en_US-lessac-high")),
        );
        assert!(a.is_ok() && b.is_ok() && c.is_ok());
        assert_eq!(f.engine.max_in_flight.load(Ordering::SeqCst), 1);
    }
}
