//! Error types for aq-sql

use thiserror::Error;

/// SQL parsing and safety errors
#[derive(Error, Debug)]
pub enum SqlError {
    /// SQL parse error (S001)
    #[error("[S001] SQL parse error at line {line}, column {column}: {message}")]
    ParseError {
        message: String,
        line: usize,
        column: usize,
    },

    /// Empty SQL (S002)
    #[error("[S002] SQL is empty")]
    EmptySql,

    /// Statement rejected by the safety gate (S003)
    #[error("[S003] Unsafe SQL detected: {reason}")]
    UnsafeSql { reason: String },
}

/// Result type alias for SqlError
pub type SqlResult<T> = Result<T, SqlError>;
