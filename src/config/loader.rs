//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `PIPERBOX_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `PIPERBOX_SERVER__PORT=8080`
/// - `PIPERBOX_ENGINE__BINARY=/opt/piper/piper`
/// - `PIPERBOX_ENGINE__TIMEOUT_SECS=30`
/// - `PIPERBOX_STORAGE__DATA_DIR=/data/piper`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    // 列表类字段（candidates、cors_origins、voices）由 serde 默认值提供
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5600)?
        .set_default("server.environment", "production")?
        .set_default("engine.timeout_secs", 60)?
        .set_default("engine.probe_timeout_secs", 5)?
        .set_default("engine.max_concurrent", 4)?
        .set_default("storage.data_dir", "piper_data")?
        .set_default("storage.output_dir", "outputs")?
        .set_default("storage.rescan_cooldown_secs", 5)?
        .set_default("synthesis.max_text_chars", 5000)?
        .set_default("synthesis.model_extension", "onnx")?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 前缀: PIPERBOX_
    // 层级分隔符: __ (双下划线)
    builder = builder.add_source(
        Environment::with_prefix("PIPERBOX")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 构建配置
    let config = builder.build()?;

    // 5. 反序列化为 AppConfig
    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    // 6. 验证配置
    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.engine.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Engine timeout cannot be 0".to_string(),
        ));
    }

    if config.engine.max_concurrent == 0 {
        return Err(ConfigError::ValidationError(
            "Engine max_concurrent cannot be 0".to_string(),
        ));
    }

    if config.synthesis.max_text_chars == 0 {
        return Err(ConfigError::ValidationError(
            "max_text_chars cannot be 0".to_string(),
        ));
    }

    let extension = &config.synthesis.model_extension;
    if extension.is_empty() || extension.contains(['.', '/', '\\']) {
        return Err(ConfigError::ValidationError(format!(
            "Invalid model extension: {:?}",
            extension
        )));
    }

    if config.voices.is_empty() {
        return Err(ConfigError::ValidationError(
            "Voice catalog cannot be empty".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for voice in &config.voices {
        if voice.id.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Voice id cannot be empty".to_string(),
            ));
        }
        if !seen.insert(voice.id.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Duplicate voice id in catalog: {}",
                voice.id
            )));
        }
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Environment: {}", config.server.environment);
    if config.server.cors_origins.is_empty() {
        tracing::info!("CORS Origins: any");
    } else {
        tracing::info!("CORS Origins: {:?}", config.server.cors_origins);
    }
    tracing::info!("Engine Binary: {:?}", config.engine.binary);
    tracing::info!("Engine Timeout: {}s", config.engine.timeout_secs);
    tracing::info!("Engine Max Concurrent: {}", config.engine.max_concurrent);
    tracing::info!("Piper Data Directory: {:?}", config.storage.data_dir);
    tracing::info!("Output Directory: {:?}", config.storage.output_dir);
    tracing::info!("Max Text Chars: {}", config.synthesis.max_text_chars);
    tracing::info!("Catalog Voices: {}", config.voices.len());
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::voice::Voice;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_timeout() {
        let mut config = AppConfig::default();
        config.engine.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_concurrency() {
        let mut config = AppConfig::default();
        config.engine.max_concurrent = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_bad_extension() {
        let mut config = AppConfig::default();
        config.synthesis.model_extension = ".onnx".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_duplicate_voice() {
        let mut config = AppConfig::default();
        config
            .voices
            .push(Voice::new("en_US-amy-high", "Amy again", "en_US", ""));
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("piperbox.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 8080
cors_origins = ["http://localhost:5173"]

[engine]
binary = "/opt/piper/piper"
timeout_secs = 30

[[voices]]
id = "en_US-lessac-high"
name = "Lessac (Female)"
lang = "en_US"
description = "Clear, professional female voice"
"#,
        )
        .unwrap();

        let config = load_config_from_path(Some(&path)).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(
            config.engine.binary.as_deref(),
            Some(Path::new("/opt/piper/piper"))
        );
        assert_eq!(config.engine.timeout_secs, 30);
        assert_eq!(config.engine.max_concurrent, 4);
        assert_eq!(config.voices.len(), 1);
        assert_eq!(config.storage.output_dir, Path::new("outputs"));
    }
}
