// Job Repository Port (Interface)

use crate::domain::{CompressionJob, JobId};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for job records.
///
/// Adapters must make reads and writes of a given job id mutually exclusive
/// so a checkpoint write never races a poll. The reference adapter is an
/// in-process map; a durable store can be substituted without touching
/// orchestration logic.
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Insert a new job
    async fn insert(&self, job: &CompressionJob) -> Result<()>;

    /// Find job by ID
    async fn find_by_id(&self, id: &JobId) -> Result<Option<CompressionJob>>;

    /// Replace the stored job record
    async fn update(&self, job: &CompressionJob) -> Result<()>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mutex-backed map repository for unit tests.
    ///
    /// The production in-memory adapter lives in the infra-memory crate.
    #[derive(Default)]
    pub struct MockJobRepository {
        jobs: Mutex<HashMap<JobId, CompressionJob>>,
    }

    impl MockJobRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn len(&self) -> usize {
            self.jobs.lock().unwrap().len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    #[async_trait]
    impl JobRepository for MockJobRepository {
        async fn insert(&self, job: &CompressionJob) -> Result<()> {
            let mut jobs = self.jobs.lock().unwrap();
            if jobs.contains_key(&job.id) {
                return Err(AppError::Internal(format!("duplicate job id: {}", job.id)));
            }
            jobs.insert(job.id.clone(), job.clone());
            Ok(())
        }

        async fn find_by_id(&self, id: &JobId) -> Result<Option<CompressionJob>> {
            Ok(self.jobs.lock().unwrap().get(id).cloned())
        }

        async fn update(&self, job: &CompressionJob) -> Result<()> {
            let mut jobs = self.jobs.lock().unwrap();
            if !jobs.contains_key(&job.id) {
                return Err(AppError::NotFound(format!("job {}", job.id)));
            }
            jobs.insert(job.id.clone(), job.clone());
            Ok(())
        }
    }
}
