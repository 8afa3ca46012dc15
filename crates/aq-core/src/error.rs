//! Error types for aq-core

use thiserror::Error;

/// Core error type for askql
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: The same table appeared twice while building a schema snapshot
    #[error("[E004] Duplicate table '{name}' in schema snapshot")]
    DuplicateTable { name: String },

    /// E005: Empty table or column name in a schema snapshot
    #[error("[E005] Empty {kind} name in schema snapshot")]
    EmptyName { kind: &'static str },

    /// E006: IO error with file path context
    #[error("[E006] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<serde_yaml::Error> for CoreError {
    fn from(err: serde_yaml::Error) -> Self {
        CoreError::ConfigParseError {
            message: err.to_string(),
        }
    }
}
