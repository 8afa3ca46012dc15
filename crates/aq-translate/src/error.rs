//! Error types for aq-translate

use thiserror::Error;

/// Translation errors. Both abort translation before any SQL is returned.
#[derive(Error, Debug)]
pub enum TranslateError {
    /// No schema table mentioned and no single-table default (T001)
    #[error("[T001] No valid table mentioned in question")]
    NoTableDetected,

    /// Synthesized SQL failed the safety gate (T002)
    #[error("[T002] Unsafe SQL detected: {reason}")]
    UnsafeSql { reason: String },

    /// Vocabulary entry could not be compiled into a matcher (T003)
    #[error("[T003] Invalid vocabulary entry '{entry}': {message}")]
    InvalidVocabulary { entry: String, message: String },
}

/// Result type alias for TranslateError
pub type TranslateResult<T> = Result<T, TranslateError>;

impl From<aq_sql::SqlError> for TranslateError {
    fn from(err: aq_sql::SqlError) -> Self {
        match err {
            aq_sql::SqlError::UnsafeSql { reason } => TranslateError::UnsafeSql { reason },
            other => TranslateError::UnsafeSql {
                reason: other.to_string(),
            },
        }
    }
}
