//! Error types for mq-core

use thiserror::Error;

/// Core error type for MQ2
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Configuration file not found
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Invalid configuration value
    #[error("[C002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C003: Identifier is empty or would escape its parent directory
    #[error("[C003] Invalid {kind} identifier '{value}'")]
    InvalidIdentifier { kind: &'static str, value: String },

    /// C004: Experiment parameters rejected
    #[error("[C004] Invalid experiment parameters: {message}")]
    InvalidParams { message: String },

    /// C005: Table header does not match the expected schema
    #[error("[C005] Unexpected header in {path}: expected [{expected}], found [{found}]")]
    SchemaMismatch {
        path: String,
        expected: String,
        found: String,
    },

    /// C006: CSV read/write failure with file context
    #[error("[C006] CSV error in '{path}': {source}")]
    Csv { path: String, source: csv::Error },

    /// C007: IO error
    #[error("[C007] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// C008: IO error with file path context
    #[error("[C008] Failed to access '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// C009: YAML parse error
    #[error("[C009] Config parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// C010: JSON serialization/deserialization error
    #[error("[C010] JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
