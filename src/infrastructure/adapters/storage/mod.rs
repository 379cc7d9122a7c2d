//! Storage Adapter - 文件系统产物存储

mod file_artifact_store;

pub use file_artifact_store::FileArtifactStore;
