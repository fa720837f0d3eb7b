//! Scoring-layer error type.

use thiserror::Error;

/// Errors raised while composing or caching a score.
#[derive(Error, Debug)]
pub enum ScoringError {
    /// The species has no seasonality entry and no profile; scoring
    /// proceeds with defaults, but callers that require a known species
    /// (e.g. the HTTP layer) surface this instead.
    #[error("unknown species: {0}")]
    UnknownSpecies(String),

    /// The persistence layer failed while computing or caching a score.
    #[error("persistence error: {0}")]
    Database(#[from] bayscan_db::DatabaseError),
}

/// Result type used across the scoring crate.
pub type ScoringResult<T> = Result<T, ScoringError>;
