//! Error types for response routing

use std::time::Duration;
use thiserror::Error;

/// Why a generative call produced no usable answer
///
/// Always recovered inside the router; never reaches the caller.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// The backend has no credential configured
    #[error("Generative backend unavailable")]
    Unavailable,

    /// The backend returned an error
    #[error("Generative backend error: {0}")]
    Backend(String),

    /// The backend did not answer in time
    #[error("Generative backend timed out after {0:?}")]
    Timeout(Duration),
}
