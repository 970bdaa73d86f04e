// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid job status transition: {from} -> {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Progress may not decrease: {current} -> {requested}")]
    ProgressRegression { current: u8, requested: u8 },

    #[error("Unknown media kind: {0}")]
    UnknownMediaKind(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
