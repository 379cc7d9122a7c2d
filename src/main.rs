//! Piperbox - Piper TTS HTTP 服务
//!
//! 启动顺序：配置 -> 日志 -> 目录 -> 探测引擎 -> 建立音色索引 -> HTTP 服务

use std::sync::Arc;

use piperbox::application::SynthesisLimits;
use piperbox::config::{load_config, print_config, LogConfig};
use piperbox::infrastructure::adapters::{
    locate_engine_binary, FileArtifactStore, FsVoiceRegistry, FsVoiceRegistryConfig,
    PiperEngineConfig, PiperProcessEngine,
};
use piperbox::infrastructure::http::{AppState, HttpServer, ServerConfig, ServiceInfo};
use std::time::Duration;

fn init_tracing(log: &LogConfig) {
    let log_filter = format!("{},piperbox={},tower_http=debug", log.level, log.level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config.log);

    tracing::info!("Piperbox - Piper TTS API v{}", env!("CARGO_PKG_VERSION"));
    print_config(&config);

    // 确保数据目录存在
    tokio::fs::create_dir_all(&config.storage.data_dir).await?;
    tokio::fs::create_dir_all(&config.storage.output_dir).await?;

    // 探测 piper；找不到时仍然启动，合成请求返回 503
    let binary =
        locate_engine_binary(&config.engine.probe_order(), config.engine.probe_timeout()).await;
    if binary.is_none() {
        tracing::warn!("Speech synthesis is disabled until piper is installed and the service restarted");
    }

    let engine = Arc::new(PiperProcessEngine::new(PiperEngineConfig {
        binary,
        data_dir: config.storage.data_dir.clone(),
        timeout: config.engine.timeout(),
        probe_timeout: config.engine.probe_timeout(),
    }));

    // 建立音色索引
    let registry = Arc::new(
        FsVoiceRegistry::load(FsVoiceRegistryConfig {
            asset_root: config.storage.data_dir.clone(),
            model_extension: config.synthesis.model_extension.clone(),
            catalog: config.voices.clone(),
            rescan_cooldown: Duration::from_secs(config.storage.rescan_cooldown_secs),
        })
        .await?,
    );

    // 产物目录
    let store = Arc::new(FileArtifactStore::new(&config.storage.output_dir).await?);

    let limits = SynthesisLimits {
        max_text_chars: config.synthesis.max_text_chars,
        max_concurrent: config.engine.max_concurrent,
    };
    let info = ServiceInfo {
        environment: config.server.environment.clone(),
        data_dir: config.storage.data_dir.clone(),
        output_dir: config.storage.output_dir.clone(),
    };
    let state = AppState::new(registry, engine, store, limits, info);

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(&config.server.host, config.server.port)
        .with_cors_origins(config.server.cors_origins.clone());
    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
