// In-Memory WorkQueue Implementation

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::sync::Mutex;

use mediapress_core::domain::JobId;
use mediapress_core::error::{AppError, Result};
use mediapress_core::port::WorkQueue;

/// Unbounded mpsc channel behind the work-queue port.
///
/// Multiple workers share the receiver through a mutex; each popped id is
/// handed to exactly one worker.
pub struct ChannelWorkQueue {
    tx: mpsc::UnboundedSender<JobId>,
    rx: Mutex<mpsc::UnboundedReceiver<JobId>>,
}

impl ChannelWorkQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Mutex::new(rx),
        }
    }
}

impl Default for ChannelWorkQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkQueue for ChannelWorkQueue {
    async fn push(&self, id: JobId) -> Result<()> {
        self.tx
            .send(id)
            .map_err(|e| AppError::Queue(format!("enqueue failed: {}", e)))
    }

    async fn pop(&self) -> Result<Option<JobId>> {
        let mut rx = self.rx.lock().await;
        match rx.try_recv() {
            Ok(id) => Ok(Some(id)),
            Err(mpsc::error::TryRecvError::Empty) => Ok(None),
            Err(mpsc::error::TryRecvError::Disconnected) => {
                Err(AppError::Queue("queue sender dropped".to_string()))
            }
        }
    }
}
