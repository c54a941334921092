//! Reader for JoinMap `.map` linkage-map files
//!
//! ```text
//! ; comment
//! group LG1
//! PstAAC-1   0.0
//! PstAAC-2   12.5
//! group LG2
//! ```

use std::fs;
use std::path::Path;

use mq_core::MapRow;

use crate::error::{PipelineError, PipelineResult};

const FORMAT: &str = "JoinMap";

/// Parse JoinMap map text. `path` is only used for error messages.
pub fn parse_joinmap(path: &Path, content: &str) -> PipelineResult<Vec<MapRow>> {
    let error = |line: usize, message: String| PipelineError::Format {
        format: FORMAT,
        path: path.display().to_string(),
        line: line as u64 + 1,
        message,
    };

    let mut group: Option<String> = None;
    let mut rows = Vec::new();
    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('[') {
            continue;
        }

        let mut fields = line.split_whitespace();
        let (Some(first), second) = (fields.next(), fields.next()) else {
            continue;
        };

        if first.eq_ignore_ascii_case("group") {
            let label = second.ok_or_else(|| error(index, "group without a label".to_string()))?;
            group = Some(label.to_string());
            continue;
        }

        let Some(current) = group.as_ref() else {
            return Err(error(index, format!("marker '{first}' before any group")));
        };
        let position = second
            .ok_or_else(|| error(index, format!("marker '{first}' has no position")))?
            .parse::<f64>()
            .map_err(|e| error(index, format!("bad position for '{first}': {e}")))?;

        rows.push(MapRow {
            marker: first.to_string(),
            group: current.clone(),
            position,
        });
    }

    Ok(rows)
}

/// Read a JoinMap map file from disk.
pub fn read_joinmap(path: &Path) -> PipelineResult<Vec<MapRow>> {
    let bytes = fs::read(path).map_err(|e| PipelineError::io(path, e))?;
    parse_joinmap(path, &String::from_utf8_lossy(&bytes))
}
