// Importance Detector Port (Interface)

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ImportanceRegion, MediaKind};

/// Detection errors.
///
/// A failing detection dependency surfaces as an error rather than an
/// empty region set.
#[derive(Error, Debug)]
pub enum DetectError {
    #[error("Failed to decode source: {0}")]
    DecodeFailed(String),

    #[error("Frame sampling failed: {0}")]
    FrameSampling(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for DetectError {
    fn from(err: std::io::Error) -> Self {
        DetectError::Io(err.to_string())
    }
}

/// Importance detector trait.
///
/// Returns a finite region sequence in detection order; the same input and
/// heuristics yield the same output set.
#[async_trait]
pub trait ImportanceDetector: Send + Sync {
    async fn detect(
        &self,
        source: &Path,
        kind: MediaKind,
    ) -> std::result::Result<Vec<ImportanceRegion>, DetectError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;

    /// Mock detector returning a fixed region set or a fixed error
    pub struct MockDetector {
        outcome: std::result::Result<Vec<ImportanceRegion>, String>,
    }

    impl MockDetector {
        pub fn with_regions(regions: Vec<ImportanceRegion>) -> Self {
            Self {
                outcome: Ok(regions),
            }
        }

        pub fn empty() -> Self {
            Self::with_regions(Vec::new())
        }

        pub fn failing(reason: impl Into<String>) -> Self {
            Self {
                outcome: Err(reason.into()),
            }
        }
    }

    #[async_trait]
    impl ImportanceDetector for MockDetector {
        async fn detect(
            &self,
            _source: &Path,
            _kind: MediaKind,
        ) -> std::result::Result<Vec<ImportanceRegion>, DetectError> {
            match &self.outcome {
                Ok(regions) => Ok(regions.clone()),
                Err(reason) => Err(DetectError::DecodeFailed(reason.clone())),
            }
        }
    }
}
