//! Typed schemas for the comma-delimited tables exchanged between pipeline stages.
//!
//! Every table is written with a header row and read back through a serde row
//! type. The header is checked against [`TableSchema::HEADER`] before any row
//! is deserialized, so a producer/consumer column drift fails loudly instead of
//! silently shifting values.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CoreError, CoreResult};

/// Metric cell written for markers without any QTL.
pub const NO_QTL_PLACEHOLDER: &str = "#";

/// File name of the QTL-by-marker matrix. Its trait columns are dynamic, so it
/// has no [`TableSchema`] row type.
pub const MATRIX_FILE: &str = "qtls_matrix.csv";

/// Fixed leading columns of the QTL-by-marker matrix.
pub const MATRIX_KEY_COLUMNS: &[&str] = &["Marker", "Group", "Position"];

/// A table with a fixed file name and header.
pub trait TableSchema: Serialize + DeserializeOwned {
    /// File name of the table inside an experiment directory
    const FILE_NAME: &'static str;

    /// Column names, in order
    const HEADER: &'static [&'static str];
}

/// One marker of the canonical genetic map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapRow {
    #[serde(rename = "Marker")]
    pub marker: String,
    #[serde(rename = "Group")]
    pub group: String,
    #[serde(rename = "Position")]
    pub position: f64,
}

impl TableSchema for MapRow {
    const FILE_NAME: &'static str = "map.csv";
    const HEADER: &'static [&'static str] = &["Marker", "Group", "Position"];
}

/// One QTL peak found for a trait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QtlRow {
    #[serde(rename = "Trait")]
    pub trait_name: String,
    /// Locus at the peak; empty or `-`-prefixed for interval positions
    #[serde(rename = "Locus")]
    pub locus: String,
    #[serde(rename = "Group")]
    pub group: String,
    #[serde(rename = "Position")]
    pub position: f64,
    #[serde(rename = "LOD")]
    pub lod: f64,
}

impl TableSchema for QtlRow {
    const FILE_NAME: &'static str = "qtls.csv";
    const HEADER: &'static [&'static str] = &["Trait", "Locus", "Group", "Position", "LOD"];
}

impl QtlRow {
    /// Whether the peak sits on a named marker rather than between markers.
    pub fn is_on_marker(&self) -> bool {
        is_marker_locus(&self.locus)
    }
}

/// A QTL enriched with the map marker it resolves to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QtlWithMarkerRow {
    #[serde(rename = "Trait")]
    pub trait_name: String,
    #[serde(rename = "Locus")]
    pub locus: String,
    #[serde(rename = "Group")]
    pub group: String,
    #[serde(rename = "Position")]
    pub position: f64,
    #[serde(rename = "LOD")]
    pub lod: f64,
    #[serde(rename = "Marker")]
    pub marker: String,
}

impl TableSchema for QtlWithMarkerRow {
    const FILE_NAME: &'static str = "qtls_with_mk.csv";
    const HEADER: &'static [&'static str] =
        &["Trait", "Locus", "Group", "Position", "LOD", "Marker"];
}

impl QtlWithMarkerRow {
    /// Attach a resolved marker to a QTL.
    pub fn from_qtl(qtl: &QtlRow, marker: impl Into<String>) -> Self {
        Self {
            trait_name: qtl.trait_name.clone(),
            locus: qtl.locus.clone(),
            group: qtl.group.clone(),
            position: qtl.position,
            lod: qtl.lod,
            marker: marker.into(),
        }
    }
}

/// A map marker with its QTL count, or the `#` placeholder when it has none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapWithQtlRow {
    #[serde(rename = "Marker")]
    pub marker: String,
    #[serde(rename = "Group")]
    pub group: String,
    #[serde(rename = "Position")]
    pub position: f64,
    #[serde(rename = "QTLs")]
    pub qtls: String,
}

impl TableSchema for MapWithQtlRow {
    const FILE_NAME: &'static str = "map_with_qtl.csv";
    const HEADER: &'static [&'static str] = &["Marker", "Group", "Position", "QTLs"];
}

impl MapWithQtlRow {
    /// Build the row for `marker` carrying `count` QTLs.
    pub fn new(marker: &MapRow, count: usize) -> Self {
        let qtls = if count == 0 {
            NO_QTL_PLACEHOLDER.to_string()
        } else {
            count.to_string()
        };
        Self {
            marker: marker.marker.clone(),
            group: marker.group.clone(),
            position: marker.position,
            qtls,
        }
    }

    /// Rows with a leading `#` carry no QTL and stay out of numeric series.
    pub fn is_placeholder(&self) -> bool {
        self.qtls.trim_start().starts_with('#')
    }

    /// Numeric QTL value, `None` for placeholders and unparsable cells.
    pub fn qtl_value(&self) -> Option<f64> {
        if self.is_placeholder() {
            return None;
        }
        self.qtls.trim().parse().ok()
    }
}

/// Whether a MapQTL locus names a marker (interval positions are empty or start with `-`).
pub fn is_marker_locus(locus: &str) -> bool {
    let locus = locus.trim();
    !locus.is_empty() && !locus.starts_with('-')
}

/// Write `rows` to `path` with the schema header.
pub fn write_table<T: TableSchema>(path: &Path, rows: &[T]) -> CoreResult<()> {
    let csv_err = |source| CoreError::Csv {
        path: path.display().to_string(),
        source,
    };
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(csv_err)?;
    writer.write_record(T::HEADER).map_err(csv_err)?;
    for row in rows {
        writer.serialize(row).map_err(csv_err)?;
    }
    writer.flush().map_err(|e| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(())
}

/// Read every row of the table at `path`, validating the header first.
pub fn read_table<T: TableSchema>(path: &Path) -> CoreResult<Vec<T>> {
    let csv_err = |source| CoreError::Csv {
        path: path.display().to_string(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(csv_err)?;

    let headers = reader.headers().map_err(csv_err)?.clone();
    let found: Vec<&str> = headers.iter().map(str::trim).collect();
    if found != T::HEADER {
        return Err(CoreError::SchemaMismatch {
            path: path.display().to_string(),
            expected: T::HEADER.join(","),
            found: found.join(","),
        });
    }

    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(csv_err)
}

/// Read a table that may legitimately be absent, returning `None` when it is.
pub fn read_table_if_exists<T: TableSchema>(path: &Path) -> CoreResult<Option<Vec<T>>> {
    if !path.exists() {
        log::debug!("No table at {}", path.display());
        return Ok(None);
    }
    read_table(path).map(Some)
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
