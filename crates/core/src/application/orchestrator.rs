// Orchestrator - exposed surface over the job manager and work queue

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::application::submission::{self, SubmitRequest};
use crate::domain::{AnalysisReport, CompressionJob, JobId, JobStatus, MediaKind};
use crate::error::{AppError, Result};
use crate::port::{ArtifactStore, IdProvider, JobRepository, TimeProvider, WorkQueue};

/// Read-only view of a job returned by status queries.
///
/// Polling is idempotent: with no intervening worker activity, repeated
/// calls return identical snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub job_id: JobId,
    pub kind: MediaKind,
    pub status: JobStatus,
    pub progress: u8,
    pub original_size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compressed_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
}

impl From<&CompressionJob> for JobSnapshot {
    fn from(job: &CompressionJob) -> Self {
        Self {
            job_id: job.id.clone(),
            kind: job.kind,
            status: job.status,
            progress: job.progress,
            original_size: job.original_size,
            compressed_size: job.compressed_size,
            compression_ratio: job.compression_ratio,
            analysis: job.analysis.clone(),
            error: job.error_message.clone(),
            created_at: job.created_at,
            completed_at: job.completed_at,
        }
    }
}

/// Composes submission, status queries and artifact fetch.
///
/// Only this path (via the job repository) mutates job records; backends
/// and the detector have no knowledge of them.
pub struct Orchestrator {
    job_repo: Arc<dyn JobRepository>,
    work_queue: Arc<dyn WorkQueue>,
    store: Arc<dyn ArtifactStore>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl Orchestrator {
    pub fn new(
        job_repo: Arc<dyn JobRepository>,
        work_queue: Arc<dyn WorkQueue>,
        store: Arc<dyn ArtifactStore>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            job_repo,
            work_queue,
            store,
            id_provider,
            time_provider,
        }
    }

    /// Validate and enqueue a compression job; returns its id immediately.
    pub async fn submit(&self, req: SubmitRequest) -> Result<JobId> {
        submission::execute(
            self.job_repo.as_ref(),
            self.work_queue.as_ref(),
            self.store.as_ref(),
            self.id_provider.as_ref(),
            self.time_provider.as_ref(),
            req,
        )
        .await
    }

    /// Snapshot of a job's current state.
    pub async fn get_status(&self, job_id: &JobId) -> Result<JobSnapshot> {
        let job = self
            .job_repo
            .find_by_id(job_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("job {}", job_id)))?;
        Ok(JobSnapshot::from(&job))
    }

    /// Fetch the compressed artifact of a completed job.
    pub async fn fetch(&self, job_id: &JobId) -> Result<Vec<u8>> {
        let job = self
            .job_repo
            .find_by_id(job_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("job {}", job_id)))?;

        if job.status != JobStatus::Completed {
            return Err(AppError::NotCompleted(format!(
                "job {} is {}",
                job_id, job.status
            )));
        }

        let artifact = job
            .artifact
            .as_ref()
            .ok_or_else(|| AppError::NotFound(format!("artifact for job {}", job_id)))?;

        self.store.read(artifact).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::artifact_store::mocks::MockArtifactStore;
    use crate::port::id_provider::UuidProvider;
    use crate::port::job_repository::mocks::MockJobRepository;
    use crate::port::time_provider::FixedTimeProvider;
    use crate::port::work_queue::mocks::MockWorkQueue;

    fn orchestrator() -> Orchestrator {
        let root = std::env::temp_dir().join(format!("mediapress-orch-{}", uuid::Uuid::new_v4()));
        Orchestrator::new(
            Arc::new(MockJobRepository::new()),
            Arc::new(MockWorkQueue::new()),
            Arc::new(MockArtifactStore::new(root)),
            Arc::new(UuidProvider),
            Arc::new(FixedTimeProvider(1000)),
        )
    }

    #[tokio::test]
    async fn status_of_unknown_job_is_not_found() {
        let orch = orchestrator();
        let err = orch.get_status(&"missing".to_string()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn fetch_of_unknown_job_is_not_found() {
        let orch = orchestrator();
        let err = orch.fetch(&"missing".to_string()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn submit_rejects_bad_kind_without_creating_a_job() {
        let repo = Arc::new(MockJobRepository::new());
        let root = std::env::temp_dir().join(format!("mediapress-orch-{}", uuid::Uuid::new_v4()));
        let orch = Orchestrator::new(
            repo.clone(),
            Arc::new(MockWorkQueue::new()),
            Arc::new(MockArtifactStore::new(root)),
            Arc::new(UuidProvider),
            Arc::new(FixedTimeProvider(1000)),
        );

        let err = orch
            .submit(SubmitRequest {
                kind: "hologram".to_string(),
                source: "x.png".to_string(),
                quality: None,
                adaptive: None,
                bitrate: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(repo.is_empty());
    }
}
