//! Errors for the scheduled job layer.

use thiserror::Error;

/// Errors a scheduled job can return.
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// A scoring computation failed.
    #[error("scoring error: {0}")]
    Scoring(#[from] bayscan_scoring::ScoringError),

    /// A forecast computation failed.
    #[error("forecast error: {0}")]
    Forecast(#[from] bayscan_forecast::ForecastError),

    /// An environmental source fetch failed.
    #[error("environmental source error: {0}")]
    Network(#[from] bayscan_net::NetworkError),

    /// A persistence operation failed.
    #[error("persistence error: {0}")]
    Database(#[from] bayscan_db::DatabaseError),
}

/// Result type for scheduled job operations.
pub type SchedulerResult<T> = Result<T, SchedulerError>;
