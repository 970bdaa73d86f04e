// Media Backend Port (Interface)
// Abstraction over compression strategies (learned-model or classical codec)

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{AnalysisReport, BackendCapability, ImportanceRegion};

/// Input to a single compression run.
///
/// `dest` is a staging location; the artifact store publishes it only after
/// a fully successful write.
#[derive(Debug, Clone)]
pub struct CompressRequest {
    pub source: PathBuf,
    pub dest: PathBuf,
    /// Requested quality, 1-100
    pub quality: u8,
    /// Target bitrate in kbps (audio only)
    pub bitrate: f64,
    pub adaptive: bool,
    /// Importance regions detected upstream (empty when not adaptive)
    pub regions: Vec<ImportanceRegion>,
}

/// Metrics of a successful compression
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionMetrics {
    pub original_size: u64,
    pub compressed_size: u64,
    /// `1 - compressed_size / original_size`; may be negative
    pub compression_ratio: f64,
    pub analysis: AnalysisReport,
}

impl CompressionMetrics {
    pub fn new(original_size: u64, compressed_size: u64, analysis: AnalysisReport) -> Self {
        let compression_ratio = if original_size == 0 {
            0.0
        } else {
            1.0 - compressed_size as f64 / original_size as f64
        };
        Self {
            original_size,
            compressed_size,
            compression_ratio,
            analysis,
        }
    }
}

/// Backend-level failures.
///
/// Everything a backend can get wrong converts into one of these; nothing
/// propagates past the compress boundary as an uncaught fault.
#[derive(Error, Debug)]
pub enum BackendFailure {
    #[error("Corrupt or unreadable source: {0}")]
    CorruptSource(String),

    #[error("{tool} failed: {detail}")]
    EncoderFailed { tool: String, detail: String },

    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for BackendFailure {
    fn from(err: std::io::Error) -> Self {
        BackendFailure::Io(err.to_string())
    }
}

/// Result of a compression run
pub type BackendResult = std::result::Result<CompressionMetrics, BackendFailure>;

/// Compression strategy trait.
///
/// Implementations are pure functions of their inputs; they have no
/// knowledge of job records.
#[async_trait]
pub trait MediaBackend: Send + Sync {
    /// Which strategy class this backend implements
    fn capability(&self) -> BackendCapability;

    /// File name for the published artifact, derived from the source name
    fn output_name(&self, source_name: &str) -> String {
        format!("compressed_{}", source_name)
    }

    /// Compress the source into `req.dest`.
    ///
    /// Never panics past this boundary; all failures surface as
    /// `BackendFailure` values.
    async fn compress(&self, req: &CompressRequest) -> BackendResult;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock backend behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Succeed with the given compressed size
        Success { compressed_size: u64 },
        /// Fail with a corrupt-source reason
        Fail(String),
        /// Panic (for panic isolation testing)
        Panic(String),
    }

    /// Mock media backend for lifecycle tests
    pub struct MockBackend {
        capability: BackendCapability,
        behavior: MockBehavior,
        call_count: AtomicUsize,
    }

    impl MockBackend {
        pub fn new(capability: BackendCapability, behavior: MockBehavior) -> Self {
            Self {
                capability,
                behavior,
                call_count: AtomicUsize::new(0),
            }
        }

        pub fn succeeding(compressed_size: u64) -> Self {
            Self::new(
                BackendCapability::Classical,
                MockBehavior::Success { compressed_size },
            )
        }

        pub fn failing(reason: impl Into<String>) -> Self {
            Self::new(BackendCapability::Classical, MockBehavior::Fail(reason.into()))
        }

        pub fn panicking(message: impl Into<String>) -> Self {
            Self::new(BackendCapability::Classical, MockBehavior::Panic(message.into()))
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MediaBackend for MockBackend {
        fn capability(&self) -> BackendCapability {
            self.capability
        }

        async fn compress(&self, req: &CompressRequest) -> BackendResult {
            self.call_count.fetch_add(1, Ordering::SeqCst);

            match &self.behavior {
                MockBehavior::Success { compressed_size } => {
                    // Write a placeholder artifact so publish has bytes to move
                    tokio::fs::write(&req.dest, vec![0u8; *compressed_size as usize])
                        .await
                        .map_err(BackendFailure::from)?;
                    let original_size = tokio::fs::metadata(&req.source)
                        .await
                        .map(|m| m.len())
                        .unwrap_or(0);
                    let analysis = if req.adaptive {
                        AnalysisReport::with_regions(
                            req.regions.clone(),
                            self.capability == BackendCapability::Neural,
                        )
                    } else {
                        AnalysisReport::plain(self.capability == BackendCapability::Neural)
                    };
                    Ok(CompressionMetrics::new(
                        original_size,
                        *compressed_size,
                        analysis,
                    ))
                }
                MockBehavior::Fail(reason) => Err(BackendFailure::CorruptSource(reason.clone())),
                MockBehavior::Panic(message) => panic!("{}", message),
            }
        }
    }
}
