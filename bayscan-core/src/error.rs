//! Error types for the Bayscan engine.

use thiserror::Error;

/// Top-level error type for engine operations.
///
/// Each downstream crate (persistence, scoring, scheduling, HTTP) defines its
/// own narrower error enum and converts into this one at the boundary where
/// it is surfaced to a caller, following the same shape as a typical
/// crate-per-concern workspace error hierarchy.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration failed to load or did not validate.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A persistence-layer failure (query, connection, migration).
    #[error("database error: {0}")]
    Database(String),

    /// An external environmental source (tide, weather, marine, astronomy) failed.
    #[error("environmental source error: {0}")]
    Source(String),

    /// The request referenced a species key the engine has no profile for.
    #[error("unknown species: {0}")]
    UnknownSpecies(String),

    /// The request referenced a zone id the engine has no record for.
    #[error("unknown zone: {0}")]
    UnknownZone(String),

    /// The requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Input failed validation before any side effect was attempted.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// JSON (de)serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Catch-all for internal faults that don't fit the cases above.
    #[error("{0}")]
    Internal(String),
}

impl EngineError {
    /// True for failures that are safe to retry against the same external source.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::Source(_))
    }
}

/// Result type alias used pervasively across the engine.
pub type EngineResult<T> = Result<T, EngineError>;
