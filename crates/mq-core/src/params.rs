//! Experiment parameters

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::ids::AnalysisSession;

/// The parameter pair that identifies an experiment within a session.
///
/// Equality is exact: two thresholds are the same only if their `f64` values
/// compare equal, there is no tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentParams {
    /// LOD value a marker must reach to count as a QTL hit
    pub lod_threshold: f64,

    /// MapQTL analysis session to read the QTLs from
    pub mapqtl_session: AnalysisSession,
}

impl ExperimentParams {
    /// Create a parameter pair, rejecting non-finite thresholds.
    pub fn new(lod_threshold: f64, mapqtl_session: AnalysisSession) -> CoreResult<Self> {
        if !lod_threshold.is_finite() {
            return Err(CoreError::InvalidParams {
                message: format!("LOD threshold must be a finite number, got {lod_threshold}"),
            });
        }
        Ok(Self {
            lod_threshold,
            mapqtl_session,
        })
    }

    /// Parse a parameter pair from user-supplied text.
    pub fn from_strings(lod_threshold: &str, mapqtl_session: &str) -> CoreResult<Self> {
        let lod = lod_threshold
            .trim()
            .parse::<f64>()
            .map_err(|e| CoreError::InvalidParams {
                message: format!("LOD threshold '{lod_threshold}' is not a number: {e}"),
            })?;
        Self::new(lod, AnalysisSession::parse(mapqtl_session.trim())?)
    }

    /// Key used to serialize work on identical parameters.
    ///
    /// `f64` is not `Hash`, so the threshold is keyed by its bit pattern.
    /// `-0.0` compares equal to `0.0` and shares its key.
    pub fn lock_key(&self) -> (u64, &str) {
        let lod = if self.lod_threshold == 0.0 {
            0.0_f64
        } else {
            self.lod_threshold
        };
        (lod.to_bits(), self.mapqtl_session.as_str())
    }
}

impl std::fmt::Display for ExperimentParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LOD threshold {:?}, MapQTL session {}",
            self.lod_threshold, self.mapqtl_session
        )
    }
}
