//! Reader for MapQTL `.mqo` output files
//!
//! An output file is tab-delimited with one header line. Only the `Locus`,
//! `Group`, `Position` and `LOD` columns are used; they are located by name so
//! the extra per-genotype columns MapQTL writes do not matter. Cells are read
//! as bytes and decoded lossily since MapQTL does not always write UTF-8.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use mq_core::schema::is_marker_locus;

use crate::error::{PipelineError, PipelineResult};

const FORMAT: &str = "MapQTL";

/// One row of a MapQTL output file: a marker or an interval-mapping position.
#[derive(Debug, Clone, PartialEq)]
pub struct MqoRow {
    pub locus: String,
    pub group: String,
    pub position: f64,
    pub lod: f64,
}

impl MqoRow {
    /// Whether this row is a named marker rather than an interval position.
    pub fn is_marker(&self) -> bool {
        is_marker_locus(&self.locus)
    }
}

/// A parsed MapQTL output file for one trait.
#[derive(Debug, Clone)]
pub struct MqoFile {
    pub path: PathBuf,
    pub trait_name: String,
    pub rows: Vec<MqoRow>,
}

impl MqoFile {
    /// Rows that name a marker, in file order.
    pub fn marker_rows(&self) -> impl Iterator<Item = &MqoRow> {
        self.rows.iter().filter(|row| row.is_marker())
    }
}

/// Trait name encoded in a MapQTL output file name.
///
/// `Session 2 (IM)_height.mqo` gives `height`; names without the `)_`
/// separator fall back to the whole file stem.
pub fn trait_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match stem.split_once(")_") {
        Some((_, name)) if !name.is_empty() => name.to_string(),
        _ => stem,
    }
}

struct Columns {
    locus: usize,
    group: usize,
    position: usize,
    lod: usize,
}

fn format_error(path: &Path, line: u64, message: impl Into<String>) -> PipelineError {
    PipelineError::Format {
        format: FORMAT,
        path: path.display().to_string(),
        line,
        message: message.into(),
    }
}

fn locate_columns(path: &Path, header: &csv::ByteRecord) -> PipelineResult<Columns> {
    let find = |name: &str| {
        header
            .iter()
            .position(|cell| String::from_utf8_lossy(cell).trim().eq_ignore_ascii_case(name))
            .ok_or_else(|| format_error(path, 1, format!("missing '{name}' column")))
    };
    Ok(Columns {
        locus: find("Locus")?,
        group: find("Group")?,
        position: find("Position")?,
        lod: find("LOD")?,
    })
}

fn cell<'a>(record: &'a csv::ByteRecord, index: usize) -> Cow<'a, str> {
    record
        .get(index)
        .map(String::from_utf8_lossy)
        .unwrap_or(Cow::Borrowed(""))
}

fn number(path: &Path, line: u64, column: &str, value: &str) -> PipelineResult<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| format_error(path, line, format!("{column} '{value}' is not a number")))
}

/// Read and parse a MapQTL output file.
pub fn read_mqo(path: &Path) -> PipelineResult<MqoFile> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| PipelineError::io(path, e.into()))?;

    let header = reader
        .byte_headers()
        .map_err(|e| format_error(path, 1, e.to_string()))?
        .clone();
    let columns = locate_columns(path, &header)?;

    let mut rows = Vec::new();
    for record in reader.byte_records() {
        let record = record.map_err(|e| {
            let line = e.position().map(|p| p.line()).unwrap_or(0);
            format_error(path, line, e.to_string())
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        if record.iter().all(|c| c.iter().all(u8::is_ascii_whitespace)) {
            continue;
        }

        rows.push(MqoRow {
            locus: cell(&record, columns.locus).trim().to_string(),
            group: cell(&record, columns.group).trim().to_string(),
            position: number(path, line, "Position", &cell(&record, columns.position))?,
            lod: number(path, line, "LOD", &cell(&record, columns.lod))?,
        });
    }

    Ok(MqoFile {
        path: path.to_path_buf(),
        trait_name: trait_name(path),
        rows,
    })
}

#[cfg(test)]
#[path = "mapqtl_test.rs"]
mod tests;
