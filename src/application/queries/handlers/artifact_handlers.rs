//! Artifact Query Handlers

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::ArtifactStorePort;
use crate::application::queries::LocateArtifact;

/// LocateArtifact Handler
pub struct LocateArtifactHandler {
    artifact_store: Arc<dyn ArtifactStorePort>,
}

impl LocateArtifactHandler {
    pub fn new(artifact_store: Arc<dyn ArtifactStorePort>) -> Self {
        Self { artifact_store }
    }

    pub async fn handle(&self, query: LocateArtifact) -> Result<PathBuf, ApplicationError> {
        let path = self.artifact_store.locate(&query.artifact_id).await?;
        Ok(path)
    }
}
