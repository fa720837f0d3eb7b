//! Maps engine-layer failures onto HTTP responses (§7): retryable source
//! errors and unexpected internal faults surface as 500s, bad input and
//! unknown species/zones surface as 4xx, nothing else reaches the caller.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Errors the HTTP layer can return, already classified into a status code.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Referenced a species key the engine has no record of.
    #[error("unknown species: {0}")]
    UnknownSpecies(String),

    /// Referenced a zone id that doesn't parse to one of the five zones.
    #[error("unknown zone: {0}")]
    UnknownZone(String),

    /// The requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Input failed validation before any side effect was attempted.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An external environmental source failed after its retry, or a
    /// persistence/scoring operation hit an unexpected internal fault.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<bayscan_db::DatabaseError> for ApiError {
    fn from(err: bayscan_db::DatabaseError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<bayscan_scoring::ScoringError> for ApiError {
    fn from(err: bayscan_scoring::ScoringError) -> Self {
        match err {
            bayscan_scoring::ScoringError::UnknownSpecies(s) => ApiError::UnknownSpecies(s),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<bayscan_forecast::ForecastError> for ApiError {
    fn from(err: bayscan_forecast::ForecastError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<bayscan_net::NetworkError> for ApiError {
    fn from(err: bayscan_net::NetworkError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::UnknownSpecies(_) | ApiError::UnknownZone(_) | ApiError::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if matches!(status, StatusCode::INTERNAL_SERVER_ERROR) {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Result type used by route handlers.
pub type ApiResult<T> = Result<T, ApiError>;
