//! mq-pipeline - Extraction pipeline for MQ2
//!
//! Turns an uploaded archive of MapQTL output into the experiment tables:
//! archive extraction, analysis-session discovery, map generation, QTL
//! parsing and the two joiner stages.

pub mod archive;
pub mod error;
pub mod join;
pub mod joinmap;
pub mod map;
pub mod mapqtl;
pub mod qtl;
pub mod sessions;
pub mod toolkit;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;

pub use archive::{extract_zip, Workspace};
pub use error::{PipelineError, PipelineResult};
pub use join::{add_marker_to_qtls, add_qtl_to_map};
pub use qtl::{QtlMatrix, QtlSummary};
pub use sessions::enumerate_sessions;
pub use toolkit::{MapQtlToolkit, QtlToolkit};
