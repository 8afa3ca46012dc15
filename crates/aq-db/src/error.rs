//! Error types for aq-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Schema introspection error (D003)
    #[error("[D003] Schema introspection failed: {0}")]
    SchemaError(String),

    /// Invalid identifier passed to the backend (D004)
    #[error("[D004] Invalid identifier '{0}': must contain only alphanumeric characters and underscores")]
    InvalidIdentifier(String),

    /// Mutex poisoned (D005)
    #[error("[D005] Database mutex poisoned: {0}")]
    MutexPoisoned(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        DbError::ExecutionError(err.to_string())
    }
}

impl From<aq_core::CoreError> for DbError {
    fn from(err: aq_core::CoreError) -> Self {
        DbError::SchemaError(err.to_string())
    }
}
