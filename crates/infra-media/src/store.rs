// Filesystem ArtifactStore Implementation

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use mediapress_core::domain::ArtifactRef;
use mediapress_core::error::{AppError, Result};
use mediapress_core::port::ArtifactStore;

/// Filesystem store with a staging area and a published outputs area.
///
/// Backends write into `staging/`; `publish` renames the fully written file
/// into `outputs/`, so a reader never sees a partial artifact.
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(root.join("staging"))?;
        std::fs::create_dir_all(root.join("outputs"))?;
        info!(root = %root.display(), "Artifact store ready");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    fn resolve_source(&self, source: &str) -> PathBuf {
        PathBuf::from(source)
    }

    async fn source_size(&self, source: &str) -> Result<u64> {
        let path = self.resolve_source(source);
        let meta = tokio::fs::metadata(&path)
            .await
            .map_err(|e| AppError::Storage(format!("{}: {}", path.display(), e)))?;
        Ok(meta.len())
    }

    fn staging_path(&self, job_id: &str, file_name: &str) -> PathBuf {
        self.root
            .join("staging")
            .join(format!("{}_{}", job_id, file_name))
    }

    async fn publish(&self, staging: &Path, file_name: &str) -> Result<ArtifactRef> {
        let dest = self.root.join("outputs").join(file_name);
        tokio::fs::rename(staging, &dest)
            .await
            .map_err(|e| AppError::Storage(format!("publish of {} failed: {}", file_name, e)))?;
        debug!(artifact = %dest.display(), "Artifact published");
        Ok(dest.to_string_lossy().into_owned())
    }

    async fn read(&self, artifact: &ArtifactRef) -> Result<Vec<u8>> {
        tokio::fs::read(artifact)
            .await
            .map_err(|e| AppError::NotFound(format!("artifact {}: {}", artifact, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_moves_staging_file_into_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path()).unwrap();

        let staging = store.staging_path("job-1", "compressed_a.jpg");
        tokio::fs::write(&staging, b"artifact bytes").await.unwrap();

        let artifact = store.publish(&staging, "compressed_a.jpg").await.unwrap();
        assert!(!staging.exists());
        assert_eq!(store.read(&artifact).await.unwrap(), b"artifact bytes");
    }

    #[tokio::test]
    async fn reading_missing_artifact_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path()).unwrap();

        let err = store
            .read(&"/nope/missing.bin".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn source_size_of_missing_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path()).unwrap();

        let err = store.source_size("/nope/missing.png").await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }
}
