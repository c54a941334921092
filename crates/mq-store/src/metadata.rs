//! Per-experiment metadata record (`experiment.json`)

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

use mq_core::{AnalysisSession, ExperimentId, ExperimentParams, SessionId};

use crate::error::{StoreError, StoreResult};

/// File name of the metadata record inside an experiment directory
pub const METADATA_FILE: &str = "experiment.json";

/// Metadata written once when an experiment is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentRecord {
    pub experiment_id: ExperimentId,
    pub session_id: SessionId,
    pub lod_threshold: f64,
    pub mapqtl_session: AnalysisSession,
    /// Rows of the QTL-by-marker matrix
    pub marker_count: usize,
    /// Trait columns of the QTL-by-marker matrix
    pub trait_count: usize,
    pub created_at: DateTime<Utc>,
}

impl ExperimentRecord {
    pub fn new(
        experiment_id: ExperimentId,
        session_id: SessionId,
        params: &ExperimentParams,
        marker_count: usize,
        trait_count: usize,
    ) -> Self {
        Self {
            experiment_id,
            session_id,
            lod_threshold: params.lod_threshold,
            mapqtl_session: params.mapqtl_session.clone(),
            marker_count,
            trait_count,
            created_at: Utc::now(),
        }
    }

    /// Save the record into `dir`
    ///
    /// Uses write-to-temp-then-rename pattern to prevent corruption
    pub fn save(&self, dir: &Path) -> StoreResult<()> {
        let path = dir.join(METADATA_FILE);
        let temp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&temp_path, json).map_err(|e| StoreError::io(&temp_path, e))?;
        fs::rename(&temp_path, &path).map_err(|e| StoreError::io(&path, e))?;
        Ok(())
    }
}

/// Metadata as read back from disk.
///
/// Every field is optional: a missing or malformed value reads as unknown
/// instead of failing, so listings stay usable for damaged experiments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentInfo {
    pub experiment_id: ExperimentId,
    pub session_id: Option<SessionId>,
    pub lod_threshold: Option<f64>,
    pub mapqtl_session: Option<AnalysisSession>,
    pub marker_count: Option<usize>,
    pub trait_count: Option<usize>,
    pub created_at: Option<DateTime<Utc>>,
}

impl ExperimentInfo {
    /// An info with every field unknown.
    pub fn unknown(experiment_id: ExperimentId) -> Self {
        Self {
            experiment_id,
            session_id: None,
            lod_threshold: None,
            mapqtl_session: None,
            marker_count: None,
            trait_count: None,
            created_at: None,
        }
    }

    /// Read the metadata of the experiment stored in `dir`.
    pub fn read(dir: &Path, experiment_id: ExperimentId) -> Self {
        let path = dir.join(METADATA_FILE);
        let value = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Value>(&content) {
                Ok(value) => value,
                Err(e) => {
                    log::warn!("Malformed metadata in {}: {e}", path.display());
                    return Self::unknown(experiment_id);
                }
            },
            Err(e) => {
                log::warn!("Cannot read metadata {}: {e}", path.display());
                return Self::unknown(experiment_id);
            }
        };
        Self::from_value(&value, experiment_id)
    }

    fn from_value(value: &Value, experiment_id: ExperimentId) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str);
        let count = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_u64)
                .and_then(|n| usize::try_from(n).ok())
        };

        Self {
            experiment_id,
            session_id: text("session_id").and_then(|s| SessionId::parse(s).ok()),
            lod_threshold: value.get("lod_threshold").and_then(Value::as_f64),
            mapqtl_session: text("mapqtl_session").and_then(|s| AnalysisSession::parse(s).ok()),
            marker_count: count("marker_count"),
            trait_count: count("trait_count"),
            created_at: text("created_at").and_then(|s| s.parse::<DateTime<Utc>>().ok()),
        }
    }

    /// The experiment parameters, when both are known.
    pub fn params(&self) -> Option<ExperimentParams> {
        let session = self.mapqtl_session.clone()?;
        ExperimentParams::new(self.lod_threshold?, session).ok()
    }

    /// Date and time the experiment was run, decoded from its id.
    pub fn run_at(&self) -> Option<NaiveDateTime> {
        self.experiment_id.run_at()
    }
}

#[cfg(test)]
#[path = "metadata_test.rs"]
mod tests;
