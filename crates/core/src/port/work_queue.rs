// Work Queue Port (Interface)

use crate::domain::JobId;
use crate::error::Result;
use async_trait::async_trait;

/// Work-queue interface decoupling submitters from executors.
///
/// `submit` pushes a job id and returns immediately; workers pop ids in
/// their own loop. Any concurrent runner (task pool, process pool,
/// distributed broker) satisfies the same contract.
#[async_trait]
pub trait WorkQueue: Send + Sync {
    /// Enqueue a job id for asynchronous execution
    async fn push(&self, id: JobId) -> Result<()>;

    /// Pop the next job id, or None when the queue is empty.
    ///
    /// Non-blocking; the worker loop idles between empty polls.
    async fn pop(&self) -> Result<Option<JobId>>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// FIFO queue for unit tests
    #[derive(Default)]
    pub struct MockWorkQueue {
        items: Mutex<VecDeque<JobId>>,
    }

    impl MockWorkQueue {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn len(&self) -> usize {
            self.items.lock().unwrap().len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    #[async_trait]
    impl WorkQueue for MockWorkQueue {
        async fn push(&self, id: JobId) -> Result<()> {
            self.items.lock().unwrap().push_back(id);
            Ok(())
        }

        async fn pop(&self) -> Result<Option<JobId>> {
            Ok(self.items.lock().unwrap().pop_front())
        }
    }
}
