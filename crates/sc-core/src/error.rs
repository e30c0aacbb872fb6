//! Error types for sc-core

use thiserror::Error;

/// Core error type for snowchange
#[derive(Error, Debug)]
pub enum CoreError {
    /// S001: Root folder missing or not a directory
    #[error("[S001] Invalid root folder: {path}")]
    InvalidRoot { path: String },

    /// S002: Two change scripts share a version
    #[error("[S002] The script version {version} exists more than once (second instance {path})")]
    DuplicateVersion { version: String, path: String },

    /// S003: Change history table override has too many parts
    #[error("[S003] Invalid change history table name: {name}")]
    InvalidTableName { name: String },

    /// C001: Configuration file not found
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Failed to parse configuration file
    #[error("[C002] Failed to parse config {path}: {source}")]
    ConfigParseError {
        path: String,
        source: serde_yaml::Error,
    },

    /// C003: Invalid configuration value
    #[error("[C003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C004: Requested target is not defined
    #[error("[C004] Target '{name}' not found. Available targets: {available}")]
    TargetNotFound { name: String, available: String },

    /// E001: IO error
    #[error("[E001] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E002: IO error with file path context
    #[error("[E002] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
