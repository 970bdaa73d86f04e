// Artifact Store Port (Interface)

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::ArtifactRef;
use crate::error::Result;

/// Storage surface: readable sources, staged writes, published artifacts.
///
/// Backends write to a staging path; `publish` moves the fully written file
/// to its final location and returns the artifact reference, so readers
/// never observe a partially written artifact.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Resolve a source reference to a readable path
    fn resolve_source(&self, source: &str) -> PathBuf;

    /// Size of the source in bytes
    async fn source_size(&self, source: &str) -> Result<u64>;

    /// Staging path for a job's in-flight output
    fn staging_path(&self, job_id: &str, file_name: &str) -> PathBuf;

    /// Atomically publish a fully written staging file
    async fn publish(&self, staging: &Path, file_name: &str) -> Result<ArtifactRef>;

    /// Read a published artifact
    async fn read(&self, artifact: &ArtifactRef) -> Result<Vec<u8>>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;

    /// Filesystem store rooted at a test-owned directory.
    ///
    /// The production adapter lives in the infra-media crate; this one keeps
    /// just enough behavior for lifecycle tests (stat, stage, rename, read).
    pub struct MockArtifactStore {
        root: PathBuf,
    }

    impl MockArtifactStore {
        pub fn new(root: impl Into<PathBuf>) -> Self {
            let root = root.into();
            std::fs::create_dir_all(root.join("staging")).ok();
            std::fs::create_dir_all(root.join("outputs")).ok();
            Self { root }
        }
    }

    #[async_trait]
    impl ArtifactStore for MockArtifactStore {
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
            self.root.join("staging").join(format!("{}_{}", job_id, file_name))
        }

        async fn publish(&self, staging: &Path, file_name: &str) -> Result<ArtifactRef> {
            let dest = self.root.join("outputs").join(file_name);
            tokio::fs::rename(staging, &dest)
                .await
                .map_err(|e| AppError::Storage(format!("publish failed: {}", e)))?;
            Ok(dest.to_string_lossy().into_owned())
        }

        async fn read(&self, artifact: &ArtifactRef) -> Result<Vec<u8>> {
            tokio::fs::read(artifact)
                .await
                .map_err(|e| AppError::NotFound(format!("artifact {}: {}", artifact, e)))
        }
    }
}
