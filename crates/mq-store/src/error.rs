//! Error types for mq-store

use mq_core::{CoreError, ExperimentId, SessionId};
use mq_pipeline::PipelineError;
use thiserror::Error;

/// Experiment store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// S001: No upload session with this id
    #[error("[S001] Session not found: {session}")]
    SessionNotFound { session: String },

    /// S002: No experiment with this id in the session
    #[error("[S002] Experiment '{experiment}' not found in session {session}")]
    ExperimentNotFound {
        session: SessionId,
        experiment: String,
    },

    /// S003: Requested output file is not part of the experiment
    #[error("[S003] File '{name}' not found in experiment {experiment}")]
    FileNotFound {
        experiment: ExperimentId,
        name: String,
    },

    /// S004: Uploaded file could not be stored
    #[error("[S004] Invalid upload '{path}': {message}")]
    InvalidUpload { path: String, message: String },

    /// S005: Packaging the experiment archive failed
    #[error("[S005] Failed to package experiment {experiment}: {source}")]
    Package {
        experiment: ExperimentId,
        #[source]
        source: zip::result::ZipError,
    },

    /// S006: IO error with file path context
    #[error("[S006] Failed to access '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// S007: Metadata record could not be encoded
    #[error("[S007] Failed to encode metadata: {0}")]
    Json(#[from] serde_json::Error),

    /// S008: Pipeline error propagation
    #[error("[S008] {0}")]
    Pipeline(#[from] PipelineError),

    /// S009: Core error propagation
    #[error("[S009] {0}")]
    Core(#[from] CoreError),
}

/// Result type alias for StoreError
pub type StoreResult<T> = Result<T, StoreError>;

/// Classification of a [`StoreError`] for callers that report to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed archive, bad identifier or parameter
    InvalidInput,
    /// Unknown session, experiment, analysis session or file
    NotFound,
    /// The parameters produced no QTL matrix
    NoResults,
    /// A QTL references a marker missing from the map
    Integrity,
    /// Disk or encoding failure
    Resource,
}

fn core_kind(error: &CoreError) -> ErrorKind {
    match error {
        CoreError::InvalidIdentifier { .. }
        | CoreError::InvalidParams { .. }
        | CoreError::ConfigInvalid { .. }
        | CoreError::YamlParse(_) => ErrorKind::InvalidInput,
        CoreError::ConfigNotFound { .. } => ErrorKind::NotFound,
        CoreError::SchemaMismatch { .. } => ErrorKind::Integrity,
        _ => ErrorKind::Resource,
    }
}

impl StoreError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::SessionNotFound { .. }
            | StoreError::ExperimentNotFound { .. }
            | StoreError::FileNotFound { .. } => ErrorKind::NotFound,
            StoreError::InvalidUpload { .. } => ErrorKind::InvalidInput,
            StoreError::Package { .. } | StoreError::Io { .. } | StoreError::Json(_) => {
                ErrorKind::Resource
            }
            StoreError::Pipeline(e) => match e {
                PipelineError::Extraction { .. }
                | PipelineError::UnsafeEntry { .. }
                | PipelineError::Format { .. } => ErrorKind::InvalidInput,
                PipelineError::NoSuchSession { .. } => ErrorKind::NotFound,
                PipelineError::NoMatrix { .. } => ErrorKind::NoResults,
                PipelineError::UnknownMarker { .. } => ErrorKind::Integrity,
                PipelineError::Io { .. } => ErrorKind::Resource,
                PipelineError::Core(c) => core_kind(c),
            },
            StoreError::Core(e) => core_kind(e),
        }
    }

    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
