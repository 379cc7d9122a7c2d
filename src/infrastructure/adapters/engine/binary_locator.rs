//! Engine Binary Locator - 启动时探测 piper 可执行文件
//!
//! 依次尝试候选路径，运行 `<candidate> --help`，第一个以 0 退出的即为引擎

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// 默认候选路径（`piper` 通过 PATH 查找）
pub const DEFAULT_ENGINE_CANDIDATES: &[&str] = &[
    "piper",
    "/usr/local/bin/piper",
    "/usr/local/bin/piper/piper",
    "/usr/bin/piper",
    "/opt/piper/piper",
];

/// 返回第一个可用的引擎路径
pub async fn locate_engine_binary(
    candidates: &[PathBuf],
    probe_timeout: Duration,
) -> Option<PathBuf> {
    for candidate in candidates {
        if probe_binary(candidate, probe_timeout).await {
            tracing::info!(path = %candidate.display(), "Found piper binary");
            return Some(candidate.clone());
        }
        tracing::debug!(path = %candidate.display(), "Piper candidate not usable");
    }

    tracing::error!("Piper binary not found in any expected location");
    None
}

/// 运行 `--help`，在超时内以 0 退出视为可用
pub async fn probe_binary(path: &Path, probe_timeout: Duration) -> bool {
    let mut child = match Command::new(path)
        .arg("--help")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
    {
        Ok(child) => child,
        Err(_) => return false,
    };

    match tokio::time::timeout(probe_timeout, child.wait()).await {
        Ok(Ok(status)) => status.success(),
        Ok(Err(_)) => false,
        Err(_) => {
            let _ = child.kill().await;
            false
        }
    }
}
