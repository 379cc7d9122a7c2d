//! Filesystem Voice Registry - 基于资产目录的音色注册表
//!
//! 实现 VoiceRegistryPort trait
//!
//! 启动时扫描一次资产目录，建立 `voice id -> ModelAsset` 的内存索引。
//! 命中时只做一次 stat；未命中或文件已被移除时重建索引（受冷却时间限制），
//! 因此新安装/删除的模型无需重启即可生效。冷却窗口内新安装的模型
//! 要等窗口结束或显式 refresh 后才可见。
//! 扫描由 rebuild_lock 串行化，并发未命中在一个冷却窗口内只触发一次扫描。

use async_trait::async_trait;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use walkdir::WalkDir;

use crate::application::ports::VoiceRegistryPort;
use crate::domain::voice::{ModelAsset, Voice, VoiceError, VoiceId, VoiceStatus};

/// 注册表配置
#[derive(Debug, Clone)]
pub struct FsVoiceRegistryConfig {
    /// 资产根目录（递归扫描）
    pub asset_root: PathBuf,
    /// 模型文件扩展名（不含点）
    pub model_extension: String,
    /// 静态音色目录
    pub catalog: Vec<Voice>,
    /// 两次按需重建之间的最短间隔；显式 refresh 不受限制
    pub rescan_cooldown: Duration,
}

impl FsVoiceRegistryConfig {
    pub fn new(asset_root: impl Into<PathBuf>, catalog: Vec<Voice>) -> Self {
        Self {
            asset_root: asset_root.into(),
            model_extension: "onnx".to_string(),
            catalog,
            rescan_cooldown: Duration::from_secs(5),
        }
    }
}

/// 内存索引
struct VoiceIndex {
    assets: HashMap<String, ModelAsset>,
    scanned_at: Option<Instant>,
    /// 每次重建加一，用于判断等待期间索引是否已被替换
    generation: u64,
}

impl VoiceIndex {
    fn empty() -> Self {
        Self {
            assets: HashMap::new(),
            scanned_at: None,
            generation: 0,
        }
    }
}

/// 文件系统音色注册表
pub struct FsVoiceRegistry {
    config: FsVoiceRegistryConfig,
    index: RwLock<VoiceIndex>,
    /// 同一时刻只允许一次扫描
    rebuild_lock: Mutex<()>,
}

impl FsVoiceRegistry {
    /// 创建注册表并立即建立索引
    pub async fn load(config: FsVoiceRegistryConfig) -> Result<Self, VoiceError> {
        let registry = Self {
            config,
            index: RwLock::new(VoiceIndex::empty()),
            rebuild_lock: Mutex::new(()),
        };
        let count = registry.rebuild().await?;

        tracing::info!(
            asset_root = %registry.config.asset_root.display(),
            voices_indexed = count,
            "Voice index built"
        );
        Ok(registry)
    }

    /// 重新扫描资产目录并替换索引
    async fn rebuild(&self) -> Result<usize, VoiceError> {
        let _scan = self.rebuild_lock.lock().await;
        self.scan_and_swap().await
    }

    /// 调用方必须持有 rebuild_lock
    async fn scan_and_swap(&self) -> Result<usize, VoiceError> {
        let root = self.config.asset_root.clone();
        let extension = self.config.model_extension.clone();

        let assets = tokio::task::spawn_blocking(move || scan_assets(&root, &extension))
            .await
            .map_err(|e| VoiceError::ScanFailed(e.to_string()))?;

        let count = assets.len();
        let mut index = self.index.write().await;
        index.assets = assets;
        index.scanned_at = Some(Instant::now());
        index.generation += 1;
        Ok(count)
    }

    /// 冷却时间已过才重建
    ///
    /// `seen` 为调用方查索引时看到的代数。等锁期间若已有其他请求完成重建，
    /// 直接返回 true 让调用方重查，不再重复扫描。
    /// 返回索引是否比 `seen` 更新。
    async fn rebuild_if_cool(&self, seen: u64) -> Result<bool, VoiceError> {
        let _scan = self.rebuild_lock.lock().await;

        let (generation, scanned_at) = {
            let index = self.index.read().await;
            (index.generation, index.scanned_at)
        };
        if generation != seen {
            return Ok(true);
        }

        let due = scanned_at.map_or(true, |at| at.elapsed() >= self.config.rescan_cooldown);
        if !due {
            return Ok(false);
        }

        self.scan_and_swap().await?;
        Ok(true)
    }

    /// 查索引并确认文件仍存在，同时返回查询时的索引代数
    async fn lookup(&self, voice_id: &str) -> (Option<ModelAsset>, u64) {
        let (asset, generation) = {
            let index = self.index.read().await;
            (index.assets.get(voice_id).cloned(), index.generation)
        };

        let Some(asset) = asset else {
            return (None, generation);
        };
        if is_installed(asset.model_path()).await {
            (Some(asset), generation)
        } else {
            (None, generation)
        }
    }

    async fn installed_flags(&self) -> (Vec<bool>, u64) {
        let (paths, generation) = {
            let index = self.index.read().await;
            let paths: Vec<Option<PathBuf>> = self
                .config
                .catalog
                .iter()
                .map(|voice| {
                    index
                        .assets
                        .get(&voice.id)
                        .map(|asset| asset.model_path().to_path_buf())
                })
                .collect();
            (paths, index.generation)
        };

        let mut flags = Vec::with_capacity(paths.len());
        for path in &paths {
            flags.push(match path {
                Some(path) => is_installed(path).await,
                None => false,
            });
        }
        (flags, generation)
    }
}

#[async_trait]
impl VoiceRegistryPort for FsVoiceRegistry {
    async fn list_voices(&self) -> Result<Vec<VoiceStatus>, VoiceError> {
        let (mut flags, seen) = self.installed_flags().await;
        if flags.iter().any(|installed| !installed) && self.rebuild_if_cool(seen).await? {
            flags = self.installed_flags().await.0;
        }

        Ok(self
            .config
            .catalog
            .iter()
            .cloned()
            .zip(flags)
            .map(|(voice, installed)| VoiceStatus { voice, installed })
            .collect())
    }

    async fn resolve(&self, voice_id: &VoiceId) -> Result<ModelAsset, VoiceError> {
        let (asset, seen) = self.lookup(voice_id.as_str()).await;
        if let Some(asset) = asset {
            return Ok(asset);
        }

        // 未命中或已失效：按需重建一次
        if self.rebuild_if_cool(seen).await? {
            if let (Some(asset), _) = self.lookup(voice_id.as_str()).await {
                tracing::debug!(voice_id = %asset.voice_id(), "Voice found after index rebuild");
                return Ok(asset);
            }
        }

        Err(VoiceError::NotFound(voice_id.to_string()))
    }

    async fn refresh(&self) -> Result<usize, VoiceError> {
        self.rebuild().await
    }

    async fn indexed_count(&self) -> usize {
        self.index.read().await.assets.len()
    }
}

async fn is_installed(model_path: &Path) -> bool {
    tokio::fs::metadata(model_path)
        .await
        .map_or(false, |meta| meta.is_file())
}

/// 递归扫描 `<root>` 下所有 `<id>.<ext>` 文件
///
/// 同一 ID 出现多次时取最浅的路径，深度相同时取字典序最小的路径。
/// 扫描过程中被并发删除/无权限的条目直接跳过。
fn scan_assets(root: &Path, extension: &str) -> HashMap<String, ModelAsset> {
    let suffix = format!(".{}", extension);
    let mut found: HashMap<String, (usize, PathBuf)> = HashMap::new();

    if !root.is_dir() {
        tracing::warn!(asset_root = %root.display(), "Asset root does not exist");
        return HashMap::new();
    }

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(stem) = entry
            .file_name()
            .to_str()
            .and_then(|name| name.strip_suffix(suffix.as_str()))
        else {
            continue;
        };
        if stem.is_empty() {
            continue;
        }

        let candidate = (entry.depth(), entry.path().to_path_buf());
        match found.entry(stem.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(candidate);
            }
            Entry::Occupied(mut slot) => {
                tracing::warn!(
                    voice_id = %stem,
                    kept = %slot.get().1.display(),
                    other = %candidate.1.display(),
                    "Duplicate voice model"
                );
                if candidate < *slot.get() {
                    slot.insert(candidate);
                }
            }
        }
    }

    found
        .into_iter()
        .filter_map(|(stem, (_, path))| {
            let id = VoiceId::new(&stem).ok()?;
            Some((stem, ModelAsset::discover(id, path)))
        })
        .collect()
}
