//! Error types for the detection pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised to the boundary layer.
///
/// The core never partially reports: a run either produces the full
/// [`crate::envelope::DetectionReport`] or returns one of these.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum DetectionError {
    #[error("invalid input: {0}")]
    BadInput(String),

    #[error("batch contains no transactions")]
    EmptyBatch,

    #[error("analysis deadline exceeded")]
    Timeout,

    #[error("internal error: {0}")]
    Internal(String),
}

pub type DetectionResult<T> = Result<T, DetectionError>;
