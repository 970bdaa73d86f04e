// Domain Layer - Pure business logic and entities

pub mod analysis;
pub mod capability;
pub mod error;
pub mod job;
pub mod region;

// Re-exports
pub use analysis::AnalysisReport;
pub use capability::{BackendCapability, CapabilityTable};
pub use error::DomainError;
pub use job::{
    ArtifactRef, CompressionJob, JobId, JobStatus, MediaKind, QualityParams, PROGRESS_ACCEPTED,
    PROGRESS_BACKEND_START, PROGRESS_DONE,
};
pub use region::{ImportanceRegion, RegionKind};
