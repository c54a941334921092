//! Error types for mq-pipeline

use mq_core::AnalysisSession;
use thiserror::Error;

/// Pipeline stage errors
#[derive(Error, Debug)]
pub enum PipelineError {
    /// P001: Archive could not be opened or decoded
    #[error("[P001] Failed to extract archive '{path}': {source}")]
    Extraction {
        path: String,
        #[source]
        source: zip::result::ZipError,
    },

    /// P002: Archive entry would be written outside the workspace
    #[error("[P002] Refusing to extract unsafe archive entry '{entry}'")]
    UnsafeEntry { entry: String },

    /// P003: No map or MapQTL output exists for the requested analysis session
    #[error("[P003] No data found for MapQTL session '{session}'")]
    NoSuchSession { session: AnalysisSession },

    /// P004: The session/threshold combination produced no QTL matrix
    #[error("[P004] No QTL matrix for MapQTL session '{session}' at LOD threshold {lod_threshold:?}")]
    NoMatrix {
        session: AnalysisSession,
        lod_threshold: f64,
    },

    /// P005: A QTL references a marker or linkage group missing from the map
    #[error("[P005] QTL for trait '{trait_name}' at '{locus}' (group {group}) has no marker in the map")]
    UnknownMarker {
        trait_name: String,
        locus: String,
        group: String,
    },

    /// P006: An input file does not follow its expected format
    #[error("[P006] Malformed {format} file '{path}' at line {line}: {message}")]
    Format {
        format: &'static str,
        path: String,
        line: u64,
        message: String,
    },

    /// P007: IO error with file path context
    #[error("[P007] Failed to access '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// P008: Core error propagation
    #[error("[P008] {0}")]
    Core(#[from] mq_core::CoreError),
}

/// Result type alias for PipelineError
pub type PipelineResult<T> = Result<T, PipelineError>;

impl PipelineError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
