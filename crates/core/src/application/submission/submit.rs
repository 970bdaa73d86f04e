// Submit Use Case - validate, create a Pending job, enqueue

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{CompressionJob, MediaKind, QualityParams};
use crate::error::{AppError, Result};
use crate::port::{ArtifactStore, IdProvider, JobRepository, TimeProvider, WorkQueue};

/// Default bitrate in kbps (audio only)
pub const DEFAULT_BITRATE_KBPS: f64 = 6.0;

/// Submission request.
///
/// `kind` is parsed from its wire form so a bad value is a validation
/// error, not a deserialization fault.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub kind: String,
    pub source: String,

    /// Quality 1-100; defaults to 80 (50 for video)
    #[serde(default)]
    pub quality: Option<u8>,

    /// Defaults to true
    #[serde(default)]
    pub adaptive: Option<bool>,

    /// Target bitrate in kbps, audio only; defaults to 6.0
    #[serde(default)]
    pub bitrate: Option<f64>,
}

/// Validate a submission and resolve defaults.
pub fn validate_request(req: &SubmitRequest) -> Result<(MediaKind, QualityParams)> {
    let kind: MediaKind = req
        .kind
        .parse()
        .map_err(|_| AppError::Validation(format!("unknown media kind: {}", req.kind)))?;

    if req.source.trim().is_empty() {
        return Err(AppError::Validation("source must not be empty".to_string()));
    }

    let quality = req.quality.unwrap_or_else(|| kind.default_quality());
    if !(1..=100).contains(&quality) {
        return Err(AppError::Validation(format!(
            "quality out of range (1-100): {}",
            quality
        )));
    }

    let bitrate = req.bitrate.unwrap_or(DEFAULT_BITRATE_KBPS);
    if !bitrate.is_finite() || bitrate <= 0.0 {
        return Err(AppError::Validation(format!(
            "bitrate must be positive: {}",
            bitrate
        )));
    }

    Ok((
        kind,
        QualityParams {
            quality,
            adaptive: req.adaptive.unwrap_or(true),
            bitrate,
        },
    ))
}

/// Execute the submit use case.
///
/// Validates, records the source size, inserts a Pending job and pushes its
/// id onto the work queue. Returns immediately; compression runs on the
/// worker pool. No job is created when validation fails.
pub async fn execute(
    job_repo: &dyn JobRepository,
    work_queue: &dyn WorkQueue,
    store: &dyn ArtifactStore,
    id_provider: &dyn IdProvider,
    time_provider: &dyn TimeProvider,
    req: SubmitRequest,
) -> Result<String> {
    let (kind, params) = validate_request(&req)?;

    // An unreadable source is rejected up front; a present-but-corrupt one
    // surfaces later as a backend failure on the job record.
    let original_size = store
        .source_size(&req.source)
        .await
        .map_err(|e| AppError::Validation(format!("source not readable: {}", e)))?;

    let job_id = id_provider.generate_id();
    let created_at = time_provider.now_millis();

    let job = CompressionJob::new(
        job_id.clone(),
        created_at,
        kind,
        req.source,
        original_size,
        params,
    );

    job_repo.insert(&job).await?;
    work_queue.push(job_id.clone()).await?;

    info!(job_id = %job_id, kind = %kind, original_size, "Job submitted");

    Ok(job_id)
}
