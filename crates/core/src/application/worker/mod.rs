// Worker - detect + compress execution loop

pub mod constants;
mod shutdown;

use constants::*;
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};

use std::sync::Arc;

use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::application::dispatch::Dispatcher;
use crate::domain::{ArtifactRef, CompressionJob, PROGRESS_BACKEND_START};
use crate::error::Result;
use crate::port::{
    ArtifactStore, CompressRequest, CompressionMetrics, ImportanceDetector, JobRepository,
    TimeProvider, WorkQueue,
};

/// Output of a successful pipeline run
struct PipelineOutput {
    metrics: CompressionMetrics,
    artifact: ArtifactRef,
}

/// Worker processes compression jobs popped from the work queue.
///
/// One worker handles one job at a time; multiple workers share the queue.
/// A failure terminates only the offending job.
pub struct Worker {
    job_repo: Arc<dyn JobRepository>,
    work_queue: Arc<dyn WorkQueue>,
    dispatcher: Arc<Dispatcher>,
    detector: Arc<dyn ImportanceDetector>,
    store: Arc<dyn ArtifactStore>,
    time_provider: Arc<dyn TimeProvider>,
}

impl Worker {
    pub fn new(
        job_repo: Arc<dyn JobRepository>,
        work_queue: Arc<dyn WorkQueue>,
        dispatcher: Arc<Dispatcher>,
        detector: Arc<dyn ImportanceDetector>,
        store: Arc<dyn ArtifactStore>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            job_repo,
            work_queue,
            dispatcher,
            detector,
            store,
            time_provider,
        }
    }

    /// Run worker loop with graceful shutdown support
    pub async fn run(&self, mut shutdown: ShutdownToken) -> Result<()> {
        info!("Worker started");
        loop {
            if shutdown.is_shutdown() {
                info!("Worker shutting down");
                break;
            }
            match self.process_next_job().await {
                Ok(processed) => {
                    if !processed {
                        tokio::select! {
                            _ = sleep(IDLE_SLEEP_DURATION) => {},
                            _ = shutdown.wait() => {
                                info!("Worker interrupted during idle");
                                break;
                            }
                        }
                    }
                }
                Err(e) => {
                    error!("Worker error: {}", e);
                    tokio::select! {
                        _ = sleep(ERROR_RECOVERY_SLEEP_DURATION) => {},
                        _ = shutdown.wait() => {
                            info!("Worker interrupted during error recovery");
                            break;
                        }
                    }
                }
            }
        }
        info!("Worker stopped");
        Ok(())
    }

    /// Process next job from the queue (returns true if a job was processed)
    pub async fn process_next_job(&self) -> Result<bool> {
        let job_id = match self.work_queue.pop().await? {
            Some(id) => id,
            None => return Ok(false),
        };

        let mut job = match self.job_repo.find_by_id(&job_id).await? {
            Some(j) => j,
            None => {
                warn!(job_id = %job_id, "Queued job id has no record, skipping");
                return Ok(true);
            }
        };

        info!(job_id = %job.id, kind = %job.kind, "Processing job");

        // Pending -> Processing (progress 10). A job popped twice would be
        // terminal or already processing here; skip it instead of failing
        // the worker loop.
        if let Err(e) = job.start() {
            warn!(job_id = %job.id, error = %e, "Job not startable, skipping");
            return Ok(true);
        }
        self.job_repo.update(&job).await?;

        // Execute with panic isolation: a panicking backend must not kill
        // the worker pool.
        let job_for_exec = job.clone();
        let job_repo = Arc::clone(&self.job_repo);
        let dispatcher = Arc::clone(&self.dispatcher);
        let detector = Arc::clone(&self.detector);
        let store = Arc::clone(&self.store);

        let handle = tokio::task::spawn(async move {
            Self::execute_pipeline(job_repo, dispatcher, detector, store, job_for_exec).await
        });
        let pipeline_result = handle.await;

        // Reload the record; the pipeline wrote checkpoint updates.
        if let Some(current) = self.job_repo.find_by_id(&job_id).await? {
            job = current;
        }
        let now = self.time_provider.now_millis();

        match pipeline_result {
            Ok(Ok(output)) => {
                job.complete(
                    now,
                    output.artifact,
                    output.metrics.compressed_size,
                    output.metrics.compression_ratio,
                    output.metrics.analysis,
                )?;
                info!(
                    job_id = %job.id,
                    compressed_size = ?job.compressed_size,
                    "Job completed"
                );
                self.job_repo.update(&job).await?;
            }
            Ok(Err(reason)) => {
                error!(job_id = %job.id, error = %reason, "Job failed");
                job.fail(now, reason)?;
                self.job_repo.update(&job).await?;
            }
            Err(join_err) => {
                let cause = if join_err.is_panic() {
                    format!("unexpected panic during compression: {}", join_err)
                } else {
                    format!("compression task cancelled: {}", join_err)
                };
                error!(job_id = %job.id, error = %cause, "Job aborted");
                job.fail(now, cause)?;
                self.job_repo.update(&job).await?;
            }
        }
        Ok(true)
    }

    /// Detection then compression for a single job.
    ///
    /// Static to avoid moving the worker into the spawned task. Any failure
    /// is reported as a human-readable reason captured on the job record.
    async fn execute_pipeline(
        job_repo: Arc<dyn JobRepository>,
        dispatcher: Arc<Dispatcher>,
        detector: Arc<dyn ImportanceDetector>,
        store: Arc<dyn ArtifactStore>,
        mut job: CompressionJob,
    ) -> std::result::Result<PipelineOutput, String> {
        // Checkpoint: backend invocation about to start
        job.checkpoint(PROGRESS_BACKEND_START)
            .map_err(|e| e.to_string())?;
        job_repo.update(&job).await.map_err(|e| e.to_string())?;

        let (capability, backend) = dispatcher.select(job.kind);
        debug!(job_id = %job.id, capability = %capability, "Backend selected");

        let source = store.resolve_source(&job.source);

        // Adaptive region analysis; a no-op for audio (no detector defined)
        let regions = if job.params.adaptive && job.kind.supports_detection() {
            detector
                .detect(&source, job.kind)
                .await
                .map_err(|e| format!("importance detection failed: {}", e))?
        } else {
            Vec::new()
        };
        if !regions.is_empty() {
            debug!(job_id = %job.id, regions = regions.len(), "Importance regions detected");
        }

        let source_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| job.id.clone());
        let output_name = backend.output_name(&source_name);
        let dest = store.staging_path(&job.id, &output_name);

        let request = CompressRequest {
            source,
            dest: dest.clone(),
            quality: job.params.quality,
            bitrate: job.params.bitrate,
            adaptive: job.params.adaptive,
            regions,
        };

        let metrics = backend
            .compress(&request)
            .await
            .map_err(|e| e.to_string())?;

        // Write-then-publish: the artifact reference only exists once the
        // staging file was fully written.
        let artifact = store
            .publish(&dest, &output_name)
            .await
            .map_err(|e| format!("artifact publish failed: {}", e))?;

        Ok(PipelineOutput { metrics, artifact })
    }
}
