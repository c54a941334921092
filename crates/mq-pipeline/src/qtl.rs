//! QTL parser: finds QTL peaks above a LOD threshold and builds the QTL-by-marker matrix

use std::collections::{HashMap, HashSet};
use std::path::Path;

use mq_core::schema::MATRIX_KEY_COLUMNS;
use mq_core::{write_table, AnalysisSession, MapRow, QtlRow};

use crate::error::{PipelineError, PipelineResult};
use crate::map::order_map;
use crate::mapqtl::{read_mqo, MqoFile, MqoRow};
use crate::sessions::session_files;

/// Outcome of a successful QTL parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QtlSummary {
    /// Number of QTL peaks written to the QTL table
    pub qtl_count: usize,
    /// Rows of the QTL-by-marker matrix
    pub marker_count: usize,
    /// Trait columns of the QTL-by-marker matrix
    pub trait_count: usize,
}

fn peak_to_qtl(trait_name: &str, peak: &MqoRow) -> QtlRow {
    QtlRow {
        trait_name: trait_name.to_string(),
        locus: peak.locus.clone(),
        group: peak.group.clone(),
        position: peak.position,
        lod: peak.lod,
    }
}

/// QTL peaks of one trait file.
///
/// Consecutive rows of one linkage group with `LOD >= threshold` form a
/// region; each region yields its highest row (the first one on ties).
pub fn find_qtls(file: &MqoFile, threshold: f64) -> Vec<QtlRow> {
    let mut qtls = Vec::new();
    let mut peak: Option<&MqoRow> = None;

    for row in &file.rows {
        if peak.is_some_and(|p| p.group != row.group) {
            if let Some(p) = peak.take() {
                qtls.push(peak_to_qtl(&file.trait_name, p));
            }
        }

        if row.lod >= threshold {
            if peak.map_or(true, |p| row.lod > p.lod) {
                peak = Some(row);
            }
        } else if let Some(p) = peak.take() {
            qtls.push(peak_to_qtl(&file.trait_name, p));
        }
    }

    if let Some(p) = peak {
        qtls.push(peak_to_qtl(&file.trait_name, p));
    }
    qtls
}

/// LOD values per marker (rows) and trait (columns), zeroed below the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct QtlMatrix {
    pub traits: Vec<String>,
    pub markers: Vec<MapRow>,
    pub values: Vec<Vec<f64>>,
}

impl QtlMatrix {
    /// Build the matrix from trait files, which must already be sorted by trait.
    pub fn build(files: &[MqoFile], threshold: f64) -> Self {
        let mut seen = HashSet::new();
        let mut markers = Vec::new();
        for file in files {
            for row in file.marker_rows() {
                if seen.insert(row.locus.clone()) {
                    markers.push(MapRow {
                        marker: row.locus.clone(),
                        group: row.group.clone(),
                        position: row.position,
                    });
                }
            }
        }
        let markers = order_map(markers);

        let lods: Vec<HashMap<&str, f64>> = files
            .iter()
            .map(|file| {
                let mut by_marker = HashMap::new();
                for row in file.marker_rows() {
                    by_marker.entry(row.locus.as_str()).or_insert(row.lod);
                }
                by_marker
            })
            .collect();

        let values = markers
            .iter()
            .map(|marker| {
                lods.iter()
                    .map(|by_marker| match by_marker.get(marker.marker.as_str()) {
                        Some(&lod) if lod >= threshold => lod,
                        _ => 0.0,
                    })
                    .collect()
            })
            .collect();

        Self {
            traits: files.iter().map(|f| f.trait_name.clone()).collect(),
            markers,
            values,
        }
    }

    /// Whether any cell reached the threshold.
    pub fn has_hits(&self) -> bool {
        self.values.iter().flatten().any(|&v| v != 0.0)
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn trait_count(&self) -> usize {
        self.traits.len()
    }

    /// Write the matrix as CSV: the key columns followed by one column per trait.
    pub fn write(&self, path: &Path) -> PipelineResult<()> {
        let csv_err = |e: csv::Error| PipelineError::io(path, e.into());
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)
            .map_err(csv_err)?;

        let header = MATRIX_KEY_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(self.traits.iter().cloned());
        writer.write_record(header).map_err(csv_err)?;

        for (marker, row) in self.markers.iter().zip(&self.values) {
            let record = [
                marker.marker.clone(),
                marker.group.clone(),
                marker.position.to_string(),
            ]
            .into_iter()
            .chain(row.iter().map(f64::to_string));
            writer.write_record(record).map_err(csv_err)?;
        }
        writer.flush().map_err(|e| PipelineError::io(path, e))?;
        Ok(())
    }
}

/// Parse the QTLs of `session` at `threshold`, writing the QTL table and matrix.
///
/// Fails with [`PipelineError::NoMatrix`] when the session has no MapQTL
/// output or no marker of any trait reaches the threshold.
pub fn parse_qtls(
    workspace: &Path,
    session: &AnalysisSession,
    threshold: f64,
    qtl_output: &Path,
    matrix_output: &Path,
) -> PipelineResult<QtlSummary> {
    let no_matrix = || PipelineError::NoMatrix {
        session: session.clone(),
        lod_threshold: threshold,
    };

    let mut files = session_files(workspace, session)?
        .iter()
        .map(|path| read_mqo(path))
        .collect::<PipelineResult<Vec<_>>>()?;
    if files.is_empty() {
        return Err(no_matrix());
    }
    files.sort_by(|a, b| a.trait_name.cmp(&b.trait_name));

    let matrix = QtlMatrix::build(&files, threshold);
    if !matrix.has_hits() {
        return Err(no_matrix());
    }

    let qtls: Vec<QtlRow> = files
        .iter()
        .flat_map(|file| find_qtls(file, threshold))
        .collect();
    log::debug!(
        "Found {} QTLs over {} traits in MapQTL session {}",
        qtls.len(),
        matrix.trait_count(),
        session
    );

    write_table(qtl_output, &qtls)?;
    matrix.write(matrix_output)?;

    Ok(QtlSummary {
        qtl_count: qtls.len(),
        marker_count: matrix.marker_count(),
        trait_count: matrix.trait_count(),
    })
}

#[cfg(test)]
#[path = "qtl_test.rs"]
mod tests;
