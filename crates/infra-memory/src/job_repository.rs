// In-Memory JobRepository Implementation

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use mediapress_core::domain::{CompressionJob, JobId};
use mediapress_core::error::{AppError, Result};
use mediapress_core::port::JobRepository;

/// Job table behind an async RwLock.
///
/// The lock makes every read or write of a job record mutually exclusive
/// with writes, so a checkpoint update never races a poll.
#[derive(Default)]
pub struct InMemoryJobRepository {
    jobs: RwLock<HashMap<JobId, CompressionJob>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored job records
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn insert(&self, job: &CompressionJob) -> Result<()> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.id) {
            return Err(AppError::Internal(format!(
                "duplicate job id: {}",
                job.id
            )));
        }
        debug!(job_id = %job.id, "Job record inserted");
        jobs.insert(job.id.clone(), job.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &JobId) -> Result<Option<CompressionJob>> {
        Ok(self.jobs.read().await.get(id).cloned())
    }

    async fn update(&self, job: &CompressionJob) -> Result<()> {
        let mut jobs = self.jobs.write().await;
        if !jobs.contains_key(&job.id) {
            return Err(AppError::NotFound(format!("job {}", job.id)));
        }
        jobs.insert(job.id.clone(), job.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediapress_core::domain::MediaKind;

    #[tokio::test]
    async fn insert_and_find_round_trip() {
        let repo = InMemoryJobRepository::new();
        let job = CompressionJob::new_test(MediaKind::Image, "a.png", 100);

        repo.insert(&job).await.unwrap();
        let found = repo.find_by_id(&job.id).await.unwrap().unwrap();
        assert_eq!(found.id, job.id);
        assert_eq!(found.original_size, 100);
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected() {
        let repo = InMemoryJobRepository::new();
        let job = CompressionJob::new_test(MediaKind::Image, "a.png", 100);

        repo.insert(&job).await.unwrap();
        assert!(repo.insert(&job).await.is_err());
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn update_of_unknown_job_is_not_found() {
        let repo = InMemoryJobRepository::new();
        let job = CompressionJob::new_test(MediaKind::Audio, "a.wav", 100);

        let err = repo.update(&job).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
