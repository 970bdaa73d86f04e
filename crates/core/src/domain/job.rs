// Compression Job Domain Model

use serde::{Deserialize, Serialize};

use crate::domain::analysis::AnalysisReport;
use crate::domain::error::{DomainError, Result};

/// Job ID (UUID v4)
pub type JobId = String;

/// Progress checkpoint: job accepted by a worker
pub const PROGRESS_ACCEPTED: u8 = 10;
/// Progress checkpoint: backend invocation about to start
pub const PROGRESS_BACKEND_START: u8 = 30;
/// Progress checkpoint: compression finished successfully
pub const PROGRESS_DONE: u8 = 100;

/// Media kind of a compression job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Audio,
    Video,
}

impl MediaKind {
    /// Default quality when the caller does not specify one
    pub fn default_quality(&self) -> u8 {
        match self {
            MediaKind::Video => 50,
            _ => 80,
        }
    }

    /// Whether importance detection is defined for this kind.
    /// Audio has no detector; the adaptive flag is a no-op there.
    pub fn supports_detection(&self) -> bool {
        !matches!(self, MediaKind::Audio)
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Audio => write!(f, "audio"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

impl std::str::FromStr for MediaKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "image" => Ok(MediaKind::Image),
            "audio" => Ok(MediaKind::Audio),
            "video" => Ok(MediaKind::Video),
            other => Err(DomainError::UnknownMediaKind(other.to_string())),
        }
    }
}

/// Job Status
///
/// Transitions move strictly forward:
/// `Pending -> Processing -> (Completed | Failed)`.
/// Completed and Failed are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Processing => write!(f, "processing"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Quality parameters supplied at submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityParams {
    /// Requested quality, 1-100
    pub quality: u8,
    /// Bias quality by detected importance regions
    pub adaptive: bool,
    /// Target bitrate in kbps (audio only)
    pub bitrate: f64,
}

/// Reference to a published compressed artifact
pub type ArtifactRef = String;

/// Compression Job Entity
///
/// Created at submission, owned by the job repository thereafter. Only the
/// orchestrator/worker path mutates it; it becomes terminal at Completed or
/// Failed and is retained until explicitly evicted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionJob {
    pub id: JobId,
    pub kind: MediaKind,
    /// Source reference (resolved by the artifact store)
    pub source: String,
    pub params: QualityParams,

    pub status: JobStatus,
    /// Coarse checkpointed progress, 0-100, monotonically non-decreasing
    pub progress: u8,

    pub original_size: u64,
    /// Set iff status == Completed
    pub artifact: Option<ArtifactRef>,
    /// Set iff status == Completed
    pub compressed_size: Option<u64>,
    /// `1 - compressed_size / original_size`; may be negative
    pub compression_ratio: Option<f64>,
    /// Detection and backend analysis metadata
    pub analysis: Option<AnalysisReport>,
    /// Set iff status == Failed
    pub error_message: Option<String>,

    pub created_at: i64, // epoch ms
    pub completed_at: Option<i64>,
}

impl CompressionJob {
    /// Create a new Pending job.
    ///
    /// # Arguments
    ///
    /// * `id` - Unique job ID (injected, not generated)
    /// * `created_at` - Creation timestamp in epoch ms (injected)
    /// * `kind` - Media kind
    /// * `source` - Source reference
    /// * `original_size` - Source size in bytes
    /// * `params` - Quality parameters
    pub fn new(
        id: impl Into<String>,
        created_at: i64,
        kind: MediaKind,
        source: impl Into<String>,
        original_size: u64,
        params: QualityParams,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            source: source.into(),
            params,
            status: JobStatus::Pending,
            progress: 0,
            original_size,
            artifact: None,
            compressed_size: None,
            compression_ratio: None,
            analysis: None,
            error_message: None,
            created_at,
            completed_at: None,
        }
    }

    /// Create a test job with deterministic ID and timestamp.
    ///
    /// IDs count up from test-1; timestamps start at 1000 and step by 1000.
    /// Production code always injects ID and time via providers.
    pub fn new_test(kind: MediaKind, source: impl Into<String>, original_size: u64) -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static TEST_COUNTER: AtomicU64 = AtomicU64::new(1);

        let counter = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let params = QualityParams {
            quality: kind.default_quality(),
            adaptive: true,
            bitrate: 6.0,
        };
        Self::new(
            format!("test-{}", counter),
            (counter * 1000) as i64,
            kind,
            source,
            original_size,
            params,
        )
    }

    /// Transition Pending -> Processing; sets the accepted checkpoint.
    pub fn start(&mut self) -> Result<()> {
        if self.status != JobStatus::Pending {
            return Err(DomainError::InvalidStatusTransition {
                from: self.status.to_string(),
                to: JobStatus::Processing.to_string(),
            });
        }
        self.status = JobStatus::Processing;
        self.progress = PROGRESS_ACCEPTED;
        Ok(())
    }

    /// Record a checkpointed progress update while Processing.
    ///
    /// Progress is coarse-grained and monotonically non-decreasing; a
    /// regression is rejected rather than silently dropped.
    pub fn checkpoint(&mut self, progress: u8) -> Result<()> {
        if self.status != JobStatus::Processing {
            return Err(DomainError::InvalidStatusTransition {
                from: self.status.to_string(),
                to: JobStatus::Processing.to_string(),
            });
        }
        if progress < self.progress {
            return Err(DomainError::ProgressRegression {
                current: self.progress,
                requested: progress,
            });
        }
        self.progress = progress;
        Ok(())
    }

    /// Transition Processing -> Completed with the backend's metrics.
    pub fn complete(
        &mut self,
        now_millis: i64,
        artifact: ArtifactRef,
        compressed_size: u64,
        compression_ratio: f64,
        analysis: AnalysisReport,
    ) -> Result<()> {
        if self.status != JobStatus::Processing {
            return Err(DomainError::InvalidStatusTransition {
                from: self.status.to_string(),
                to: JobStatus::Completed.to_string(),
            });
        }
        self.status = JobStatus::Completed;
        self.progress = PROGRESS_DONE;
        self.artifact = Some(artifact);
        self.compressed_size = Some(compressed_size);
        self.compression_ratio = Some(compression_ratio);
        self.analysis = Some(analysis);
        self.completed_at = Some(now_millis);
        Ok(())
    }

    /// Transition Processing -> Failed.
    ///
    /// Progress stays at its last checkpoint, it is not reset.
    pub fn fail(&mut self, now_millis: i64, reason: impl Into<String>) -> Result<()> {
        if self.status != JobStatus::Processing {
            return Err(DomainError::InvalidStatusTransition {
                from: self.status.to_string(),
                to: JobStatus::Failed.to_string(),
            });
        }
        self.status = JobStatus::Failed;
        self.error_message = Some(reason.into());
        self.completed_at = Some(now_millis);
        Ok(())
    }
}
