//! Forecast-layer error type.

use thiserror::Error;

/// Errors raised while building forecast windows or evaluating alerts.
#[derive(Error, Debug)]
pub enum ForecastError {
    /// A scoring composition failed.
    #[error("scoring error: {0}")]
    Scoring(#[from] bayscan_scoring::ScoringError),

    /// An environmental source failed after its retry.
    #[error("environmental source error: {0}")]
    Network(#[from] bayscan_net::NetworkError),

    /// A persistence operation failed.
    #[error("persistence error: {0}")]
    Database(#[from] bayscan_db::DatabaseError),
}

/// Result type used across the forecast crate.
pub type ForecastResult<T> = Result<T, ForecastError>;
