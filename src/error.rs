//! Error types for an estimation run.

use thiserror::Error;

/// Fault raised by a random source while a worker is sampling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("random source fault: {0}")]
pub struct SourceFault(pub String);

/// Errors that abort an estimation run. No estimate is produced once one of
/// these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EstimateError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("worker {worker_id} failed: {reason}")]
    WorkerFailure { worker_id: usize, reason: String },

    #[error("incomplete results: expected {expected} partial results, received {received}")]
    IncompleteResults { expected: usize, received: usize },

    #[error("inconsistent result from worker {worker_id}: {reason}")]
    InconsistentResult { worker_id: usize, reason: String },
}

impl EstimateError {
    pub(crate) fn worker(worker_id: usize, reason: impl Into<String>) -> Self {
        EstimateError::WorkerFailure {
            worker_id,
            reason: reason.into(),
        }
    }
}

/// Convenience result alias.
pub type Result<T> = std::result::Result<T, EstimateError>;
