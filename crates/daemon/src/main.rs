//! Mediapress - Main Entry Point
//! Composition root: model loading, dependency wiring, worker pool, and a
//! one-shot submission driver for files passed on the command line.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mediapress_core::application::submission::SubmitRequest;
use mediapress_core::application::{
    shutdown_channel, BackendSet, Dispatcher, Orchestrator, Worker,
};
use mediapress_core::port::id_provider::UuidProvider;
use mediapress_core::port::time_provider::SystemTimeProvider;
use mediapress_core::port::MediaBackend;
use mediapress_infra_media::{
    ClassicalImageBackend, FfmpegAudioBackend, FfmpegInvoker, FfmpegVideoBackend,
    FsArtifactStore, HeuristicDetector, ModelCatalog, NeuralAudioBackend, NeuralImageBackend,
};
use mediapress_infra_memory::{ChannelWorkQueue, InMemoryJobRepository};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_DATA_DIR: &str = "~/.mediapress";
const DEFAULT_WORKERS: usize = 2;
const STATUS_POLL_INTERVAL: Duration = Duration::from_millis(200);

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging (JSON format for production)
    let log_format =
        std::env::var("MEDIAPRESS_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("mediapress=info"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    info!("Mediapress v{} starting...", VERSION);

    // 2. Load configuration
    let data_dir = std::env::var("MEDIAPRESS_DATA_DIR")
        .unwrap_or_else(|_| shellexpand::tilde(DEFAULT_DATA_DIR).into_owned());

    let workers: usize = std::env::var("MEDIAPRESS_WORKERS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_WORKERS);

    let image_model_path = std::env::var("MEDIAPRESS_IMAGE_MODEL").ok().map(PathBuf::from);
    let audio_model_path = std::env::var("MEDIAPRESS_AUDIO_MODEL").ok().map(PathBuf::from);

    // 3. Model-loading surface; absence is expected and non-fatal
    let catalog = ModelCatalog::load(image_model_path.as_deref(), audio_model_path.as_deref());

    // 4. Setup dependencies (DI wiring)
    let store = Arc::new(FsArtifactStore::new(&data_dir)?);
    let invoker = Arc::new(FfmpegInvoker::new());

    let backends = BackendSet {
        image_neural: catalog
            .image
            .clone()
            .map(|m| Arc::new(NeuralImageBackend::new(m)) as Arc<dyn MediaBackend>),
        image_classical: Arc::new(ClassicalImageBackend),
        audio_neural: catalog
            .audio
            .clone()
            .map(|m| Arc::new(NeuralAudioBackend::new(m)) as Arc<dyn MediaBackend>),
        audio_classical: Arc::new(FfmpegAudioBackend::new(Arc::clone(&invoker))),
        video_classical: Arc::new(FfmpegVideoBackend::new(Arc::clone(&invoker))),
    };
    let dispatcher = Arc::new(Dispatcher::new(backends));
    let detector = Arc::new(HeuristicDetector::new(Arc::clone(&invoker)));

    let job_repo = Arc::new(InMemoryJobRepository::new());
    let work_queue = Arc::new(ChannelWorkQueue::new());
    let time_provider = Arc::new(SystemTimeProvider);
    let id_provider = Arc::new(UuidProvider);

    let orchestrator = Arc::new(Orchestrator::new(
        job_repo.clone(),
        work_queue.clone(),
        store.clone(),
        id_provider,
        time_provider.clone(),
    ));

    // 5. Start worker pool
    info!(workers, "Starting worker pool...");
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let mut worker_handles = Vec::with_capacity(workers);
    for _ in 0..workers {
        let worker = Worker::new(
            job_repo.clone(),
            work_queue.clone(),
            dispatcher.clone(),
            detector.clone(),
            store.clone(),
            time_provider.clone(),
        );
        let token = shutdown_rx.clone();
        worker_handles.push(tokio::spawn(async move { worker.run(token).await }));
    }

    // 6. Submit command-line inputs, or run until Ctrl-C
    let inputs: Vec<String> = std::env::args().skip(1).collect();
    if inputs.is_empty() {
        info!("No inputs given; serving until Ctrl-C");
        tokio::signal::ctrl_c().await?;
    } else {
        let job_ids = submit_inputs(&orchestrator, inputs).await;
        wait_for_jobs(&orchestrator, &job_ids).await;
    }

    // 7. Graceful shutdown
    shutdown_tx.shutdown();
    for handle in worker_handles {
        let _ = handle.await;
    }
    info!("Mediapress stopped");
    Ok(())
}

/// Submit each input file, inferring the media kind from its extension.
async fn submit_inputs(orchestrator: &Orchestrator, inputs: Vec<String>) -> Vec<String> {
    let mut job_ids = Vec::new();
    for input in inputs {
        let Some(kind) = kind_from_extension(&input) else {
            warn!(input = %input, "Unrecognized media extension, skipping");
            continue;
        };
        let request = SubmitRequest {
            kind: kind.to_string(),
            source: input.clone(),
            quality: None,
            adaptive: None,
            bitrate: None,
        };
        match orchestrator.submit(request).await {
            Ok(job_id) => {
                info!(input = %input, job_id = %job_id, kind, "Submitted");
                job_ids.push(job_id);
            }
            Err(e) => error!(input = %input, error = %e, "Submission rejected"),
        }
    }
    job_ids
}

/// Poll until every submitted job reaches a terminal status, then report.
async fn wait_for_jobs(orchestrator: &Orchestrator, job_ids: &[String]) {
    loop {
        let mut all_terminal = true;
        for job_id in job_ids {
            if let Ok(snapshot) = orchestrator.get_status(job_id).await {
                if !snapshot.status.is_terminal() {
                    all_terminal = false;
                }
            }
        }
        if all_terminal {
            break;
        }
        tokio::time::sleep(STATUS_POLL_INTERVAL).await;
    }

    for job_id in job_ids {
        match orchestrator.get_status(job_id).await {
            Ok(snapshot) => match snapshot.error {
                None => info!(
                    job_id = %job_id,
                    original_size = snapshot.original_size,
                    compressed_size = ?snapshot.compressed_size,
                    ratio = ?snapshot.compression_ratio,
                    "Job finished"
                ),
                Some(reason) => error!(job_id = %job_id, %reason, "Job failed"),
            },
            Err(e) => error!(job_id = %job_id, error = %e, "Status query failed"),
        }
    }
}

fn kind_from_extension(path: &str) -> Option<&'static str> {
    let extension = std::path::Path::new(path)
        .extension()?
        .to_string_lossy()
        .to_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" | "png" | "gif" | "bmp" | "webp" => Some("image"),
        "wav" | "mp3" | "flac" | "ogg" | "m4a" => Some("audio"),
        "mp4" | "mov" | "avi" | "mkv" | "webm" => Some("video"),
        _ => None,
    }
}
