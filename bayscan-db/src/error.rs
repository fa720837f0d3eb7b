//! Persistence-layer error type.

use thiserror::Error;

/// Errors returned by the persistence layer.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish or use a connection.
    #[error("database connection error: {0}")]
    Connection(String),

    /// A query failed.
    #[error("database query error: {0}")]
    Query(String),

    /// A stored JSON column failed to (de)serialize.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The requested row does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Input failed validation before a write was attempted.
    #[error("validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("row not found".to_string()),
            sqlx::Error::Database(db_err) => DatabaseError::Query(db_err.to_string()),
            sqlx::Error::Io(io_err) => DatabaseError::Connection(io_err.to_string()),
            other => DatabaseError::Query(other.to_string()),
        }
    }
}

/// Result type for persistence-layer operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;
