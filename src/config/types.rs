//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::voice::{default_catalog, Voice};
use crate::infrastructure::adapters::DEFAULT_ENGINE_CANDIDATES;

/// 应用主配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 合成引擎配置
    #[serde(default)]
    pub engine: EngineConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 合成请求配置
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,

    /// 音色目录
    #[serde(default = "default_catalog")]
    pub voices: Vec<Voice>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            engine: EngineConfig::default(),
            storage: StorageConfig::default(),
            synthesis: SynthesisConfig::default(),
            log: LogConfig::default(),
            voices: default_catalog(),
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 允许跨域的来源，为空表示允许任意来源
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// 运行环境标识（仅用于状态接口展示）
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5600
}

fn default_environment() -> String {
    "production".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            environment: default_environment(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 合成引擎配置
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// 显式指定的可执行文件，优先于候选列表探测
    #[serde(default)]
    pub binary: Option<PathBuf>,

    /// 候选可执行文件路径
    #[serde(default = "default_candidates")]
    pub candidates: Vec<PathBuf>,

    /// 单次合成超时（秒）
    #[serde(default = "default_engine_timeout")]
    pub timeout_secs: u64,

    /// `--help` 探测超时（秒）
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,

    /// 同时运行的引擎进程上限
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

fn default_candidates() -> Vec<PathBuf> {
    DEFAULT_ENGINE_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .collect()
}

fn default_engine_timeout() -> u64 {
    60
}

fn default_probe_timeout() -> u64 {
    5
}

fn default_max_concurrent() -> usize {
    4
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            binary: None,
            candidates: default_candidates(),
            timeout_secs: default_engine_timeout(),
            probe_timeout_secs: default_probe_timeout(),
            max_concurrent: default_max_concurrent(),
        }
    }
}

impl EngineConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// 探测顺序：显式 binary 在前，然后是候选列表
    pub fn probe_order(&self) -> Vec<PathBuf> {
        self.binary
            .iter()
            .cloned()
            .chain(self.candidates.iter().cloned())
            .collect()
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 模型资产目录（piper 的 data/download 目录）
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// 合成产物输出目录
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// 音色索引按需重建的最短间隔（秒）
    #[serde(default = "default_rescan_cooldown")]
    pub rescan_cooldown_secs: u64,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("piper_data")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("outputs")
}

fn default_rescan_cooldown() -> u64 {
    5
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            output_dir: default_output_dir(),
            rescan_cooldown_secs: default_rescan_cooldown(),
        }
    }
}

/// 合成请求配置
#[derive(Debug, Clone, Deserialize)]
pub struct SynthesisConfig {
    /// 文本最大字符数
    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,

    /// 模型文件扩展名
    #[serde(default = "default_model_extension")]
    pub model_extension: String,
}

fn default_max_text_chars() -> usize {
    5000
}

fn default_model_extension() -> String {
    "onnx".to_string()
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            max_text_chars: default_max_text_chars(),
            model_extension: default_model_extension(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
