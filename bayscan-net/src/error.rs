//! Errors for the environmental client layer.

use thiserror::Error;

/// Errors a [`crate::sources`] client can return.
#[derive(Error, Debug)]
pub enum NetworkError {
    /// The request exceeded its bounded timeout.
    #[error("timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The upstream source returned an error after the single retry.
    #[error("source request failed: {0}")]
    Request(String),

    /// The source returned a response the client could not parse.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type for environmental client operations.
pub type NetworkResult<T> = Result<T, NetworkError>;
