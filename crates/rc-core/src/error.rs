//! Error types for rc-core

use thiserror::Error;

/// Core error type for relcheck
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

    /// E004: Relation name cannot be mapped onto database.schema.identifier
    #[error("[E004] Invalid relation name '{name}': {reason}")]
    InvalidRelationName { name: String, reason: String },

    /// E005: Unknown relation type string
    #[error("[E005] Unknown relation type '{0}'")]
    UnknownRelationType(String),

    /// E016: IO error with file path context
    #[error("[E016] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
