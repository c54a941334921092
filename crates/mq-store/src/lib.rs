//! mq-store - Experiment store for MQ2
//!
//! Keeps upload sessions and their experiments under the configured upload
//! folder, runs the extraction pipeline at most once per parameter pair,
//! packages results and serves the read-side views.

pub mod error;
pub mod lock;
pub mod metadata;
pub mod query;
pub mod repository;
pub mod retention;
pub mod store;

pub use error::{ErrorKind, StoreError, StoreResult};
pub use metadata::{ExperimentInfo, ExperimentRecord};
pub use query::{ExperimentSummary, MarkerDetail, QtlSeries};
pub use repository::{ExperimentRepository, FsRepository, Session};
pub use retention::RetentionReport;
pub use store::{ExperimentStore, RunOutcome};
