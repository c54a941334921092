//! mq-core - Core library for MQ2
//!
//! This crate provides the identifiers, configuration, experiment parameters
//! and typed table schemas shared by the extraction pipeline, the experiment
//! store and the command-line front end.

pub mod config;
pub mod error;
pub mod ids;
mod newtype_string;
pub mod params;
pub mod schema;

pub use config::Config;
pub use error::{CoreError, CoreResult};
pub use ids::{AnalysisSession, ExperimentId, SessionId};
pub use params::ExperimentParams;
pub use schema::{
    read_table, read_table_if_exists, write_table, MapRow, MapWithQtlRow, QtlRow,
    QtlWithMarkerRow, TableSchema,
};
