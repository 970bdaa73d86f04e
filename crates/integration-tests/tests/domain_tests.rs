// Domain Layer Integration Tests
// Job entity and status transitions

use mediapress_core::domain::{
    AnalysisReport, CompressionJob, JobStatus, MediaKind, QualityParams, PROGRESS_ACCEPTED,
    PROGRESS_BACKEND_START, PROGRESS_DONE,
};

fn pending_job() -> CompressionJob {
    CompressionJob::new(
        "job-1",
        1000,
        MediaKind::Image,
        "photos/cat.png",
        4096,
        QualityParams {
            quality: 80,
            adaptive: true,
            bitrate: 6.0,
        },
    )
}

#[test]
fn test_job_creation_defaults() {
    let job = pending_job();

    assert_eq!(job.status, JobStatus::Pending);
    assert_eq!(job.progress, 0);
    assert_eq!(job.original_size, 4096);
    assert!(job.artifact.is_none());
    assert!(job.compressed_size.is_none());
    assert!(job.compression_ratio.is_none());
    assert!(job.error_message.is_none());
    assert!(job.completed_at.is_none());
}

#[test]
fn test_job_lifecycle_to_completed() {
    let mut job = pending_job();

    assert!(job.start().is_ok());
    assert_eq!(job.status, JobStatus::Processing);
    assert_eq!(job.progress, PROGRESS_ACCEPTED);

    assert!(job.checkpoint(PROGRESS_BACKEND_START).is_ok());
    assert_eq!(job.progress, PROGRESS_BACKEND_START);

    job.complete(
        2000,
        "outputs/compressed_cat.jpg".to_string(),
        1024,
        0.75,
        AnalysisReport::plain(false),
    )
    .unwrap();

    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.progress, PROGRESS_DONE);
    assert_eq!(job.compressed_size, Some(1024));
    assert_eq!(job.compression_ratio, Some(0.75));
    assert!(job.artifact.is_some());
    assert!(job.error_message.is_none());
    assert_eq!(job.completed_at, Some(2000));
}

#[test]
fn test_job_lifecycle_to_failed_keeps_progress() {
    let mut job = pending_job();
    job.start().unwrap();
    job.checkpoint(PROGRESS_BACKEND_START).unwrap();

    job.fail(3000, "encoder exited with status 1").unwrap();

    assert_eq!(job.status, JobStatus::Failed);
    // Progress stays at the last checkpoint, it is not reset
    assert_eq!(job.progress, PROGRESS_BACKEND_START);
    assert_eq!(
        job.error_message.as_deref(),
        Some("encoder exited with status 1")
    );
    assert!(job.compressed_size.is_none());
    assert!(job.artifact.is_none());
}

#[test]
fn test_invalid_transitions() {
    let mut job = pending_job();

    // Cannot complete or fail without starting
    assert!(job
        .complete(1, "a".to_string(), 1, 0.5, AnalysisReport::plain(false))
        .is_err());
    assert!(job.fail(1, "nope").is_err());
    assert!(job.checkpoint(50).is_err());

    job.start().unwrap();
    // Cannot start twice
    assert!(job.start().is_err());
}

#[test]
fn test_terminal_jobs_reject_writes() {
    let mut completed = pending_job();
    completed.start().unwrap();
    completed
        .complete(2000, "a".to_string(), 10, 0.9, AnalysisReport::plain(false))
        .unwrap();

    assert!(completed.start().is_err());
    assert!(completed.checkpoint(100).is_err());
    assert!(completed.fail(3000, "late failure").is_err());
    assert!(completed
        .complete(3000, "b".to_string(), 5, 0.95, AnalysisReport::plain(false))
        .is_err());

    let mut failed = pending_job();
    failed.start().unwrap();
    failed.fail(2000, "boom").unwrap();

    assert!(failed.start().is_err());
    assert!(failed.checkpoint(100).is_err());
    assert!(failed
        .complete(3000, "b".to_string(), 5, 0.95, AnalysisReport::plain(false))
        .is_err());
}

#[test]
fn test_progress_is_monotonic() {
    let mut job = pending_job();
    job.start().unwrap();
    job.checkpoint(PROGRESS_BACKEND_START).unwrap();

    // Regression is rejected and the stored value untouched
    assert!(job.checkpoint(PROGRESS_ACCEPTED).is_err());
    assert_eq!(job.progress, PROGRESS_BACKEND_START);

    // Re-asserting the same checkpoint is fine
    assert!(job.checkpoint(PROGRESS_BACKEND_START).is_ok());
}

#[test]
fn test_job_serialization_round_trip() {
    let mut job = pending_job();
    job.start().unwrap();

    let json = serde_json::to_string(&job).unwrap();
    assert!(json.contains("\"processing\""));
    assert!(json.contains("\"image\""));

    let back: CompressionJob = serde_json::from_str(&json).unwrap();
    assert_eq!(back.id, job.id);
    assert_eq!(back.status, JobStatus::Processing);
    assert_eq!(back.progress, PROGRESS_ACCEPTED);
}
