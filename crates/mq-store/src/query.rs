//! Read-side views over the tables of an experiment
//!
//! None of these fail because an output table is missing: an experiment
//! without results reads as empty.

use chrono::NaiveDateTime;
use serde::Serialize;

use mq_core::{read_table_if_exists, ExperimentId, MapWithQtlRow, QtlWithMarkerRow, SessionId, TableSchema};
use mq_pipeline::QtlToolkit;

use crate::error::StoreResult;
use crate::metadata::ExperimentInfo;
use crate::repository::ExperimentRepository;
use crate::store::ExperimentStore;

/// Columns of the QTL-with-marker table hidden from marker detail views
const DETAIL_HIDDEN_COLUMNS: &[&str] = &["Group", "Marker"];

/// Headroom added above the highest QTL count when plotting a series
const PLOT_HEADROOM: f64 = 2.0;

/// Per-marker QTL counts laid out for plotting.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QtlSeries {
    /// QTL count of every marker carrying at least one QTL
    pub values: Vec<f64>,
    /// Every marker, placeholders included, in map order
    pub markers: Vec<String>,
    /// Distinct linkage groups in map order
    pub linkage_groups: Vec<String>,
    /// Row index where each linkage group after the first starts
    pub group_boundaries: Vec<usize>,
}

impl QtlSeries {
    /// Build the series in a single pass over map-with-QTL rows.
    ///
    /// Rows of one linkage group must be contiguous.
    pub fn from_rows(rows: &[MapWithQtlRow]) -> Self {
        let mut series = Self::default();
        for (index, row) in rows.iter().enumerate() {
            if series.linkage_groups.last() != Some(&row.group) {
                if index > 0 {
                    series.group_boundaries.push(index);
                }
                series.linkage_groups.push(row.group.clone());
            }
            series.markers.push(row.marker.clone());
            if let Some(value) = row.qtl_value() {
                series.values.push(value);
            }
        }
        series
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Upper bound of the plot axis: highest value plus headroom, 0 when empty.
    pub fn ceiling(&self) -> f64 {
        self.values
            .iter()
            .copied()
            .reduce(f64::max)
            .map_or(0.0, |max| max + PLOT_HEADROOM)
    }
}

/// QTLs resolved to one marker, as a header row plus data rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarkerDetail {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl MarkerDetail {
    /// Keep the rows of `rows` whose marker is exactly `marker`.
    pub fn from_rows(rows: &[QtlWithMarkerRow], marker: &str) -> Self {
        let headers = QtlWithMarkerRow::HEADER
            .iter()
            .filter(|column| !DETAIL_HIDDEN_COLUMNS.contains(*column))
            .map(|column| column.to_string())
            .collect();
        let rows = rows
            .iter()
            .filter(|row| row.marker == marker)
            .map(|row| {
                vec![
                    row.trait_name.clone(),
                    row.locus.clone(),
                    row.position.to_string(),
                    row.lod.to_string(),
                ]
            })
            .collect();
        Self { headers, rows }
    }
}

/// Everything a report page shows about one experiment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentSummary {
    pub info: ExperimentInfo,
    pub run_at: Option<NaiveDateTime>,
    pub series: QtlSeries,
    pub ceiling: f64,
}

impl<R: ExperimentRepository, T: QtlToolkit> ExperimentStore<R, T> {
    /// QTL counts per marker of the experiment's map-with-QTL table.
    pub fn qtl_series(&self, session: &SessionId, experiment: &ExperimentId) -> StoreResult<QtlSeries> {
        let dir = self.repository().experiment_dir(session, experiment)?;
        let series = match read_table_if_exists::<MapWithQtlRow>(&dir.join(MapWithQtlRow::FILE_NAME))? {
            Some(rows) => QtlSeries::from_rows(&rows),
            None => QtlSeries::default(),
        };
        Ok(series)
    }

    /// QTLs of the experiment that resolved to `marker`.
    pub fn marker_detail(
        &self,
        session: &SessionId,
        experiment: &ExperimentId,
        marker: &str,
    ) -> StoreResult<MarkerDetail> {
        let dir = self.repository().experiment_dir(session, experiment)?;
        let detail =
            match read_table_if_exists::<QtlWithMarkerRow>(&dir.join(QtlWithMarkerRow::FILE_NAME))? {
                Some(rows) => MarkerDetail::from_rows(&rows, marker),
                None => MarkerDetail::default(),
            };
        Ok(detail)
    }

    /// Metadata, run date, QTL series and plot ceiling of an experiment.
    pub fn experiment_summary(
        &self,
        session: &SessionId,
        experiment: &ExperimentId,
    ) -> StoreResult<ExperimentSummary> {
        let info = self.experiment_info(session, experiment)?;
        let series = self.qtl_series(session, experiment)?;
        Ok(ExperimentSummary {
            run_at: info.run_at(),
            ceiling: series.ceiling(),
            info,
            series,
        })
    }
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;
