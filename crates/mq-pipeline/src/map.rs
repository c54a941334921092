//! Map generator: builds the canonical marker table of an experiment

use std::collections::{HashMap, HashSet};
use std::path::Path;

use mq_core::{write_table, AnalysisSession, MapRow};

use crate::error::{PipelineError, PipelineResult};
use crate::joinmap::read_joinmap;
use crate::mapqtl::{read_mqo, MqoFile};
use crate::sessions::session_files;

/// Order markers by linkage group, then by position within the group.
///
/// Groups keep the order in which they first appear; the position sort is
/// stable so markers sharing a position keep their input order. Each group's
/// rows end up contiguous.
pub fn order_map(rows: Vec<MapRow>) -> Vec<MapRow> {
    let mut group_order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<MapRow>> = HashMap::new();
    for row in rows {
        if !groups.contains_key(&row.group) {
            group_order.push(row.group.clone());
        }
        groups.entry(row.group.clone()).or_default().push(row);
    }

    let mut ordered = Vec::new();
    for group in group_order {
        if let Some(mut members) = groups.remove(&group) {
            members.sort_by(|a, b| a.position.total_cmp(&b.position));
            ordered.extend(members);
        }
    }
    ordered
}

/// Drop repeated marker names, keeping the first occurrence.
fn dedup_markers(rows: Vec<MapRow>) -> Vec<MapRow> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|row| {
            let fresh = seen.insert(row.marker.clone());
            if !fresh {
                log::warn!("Marker {} listed more than once, keeping the first", row.marker);
            }
            fresh
        })
        .collect()
}

/// Marker rows of a MapQTL output file as map rows.
pub fn map_from_mqo(file: &MqoFile) -> Vec<MapRow> {
    file.marker_rows()
        .map(|row| MapRow {
            marker: row.locus.clone(),
            group: row.group.clone(),
            position: row.position,
        })
        .collect()
}

/// Build the canonical map for `session` and write it to `output`.
///
/// A JoinMap map file, when given, is the source of the map. Otherwise the
/// map comes from the first MapQTL output file of the session.
pub fn generate_map(
    workspace: &Path,
    session: &AnalysisSession,
    joinmap: Option<&Path>,
    output: &Path,
) -> PipelineResult<Vec<MapRow>> {
    let rows = match joinmap {
        Some(path) => {
            log::debug!("Reading linkage map from JoinMap file {}", path.display());
            read_joinmap(path)?
        }
        None => {
            let files = session_files(workspace, session)?;
            let first = files.first().ok_or_else(|| PipelineError::NoSuchSession {
                session: session.clone(),
            })?;
            log::debug!("Reading linkage map from {}", first.display());
            map_from_mqo(&read_mqo(first)?)
        }
    };

    if rows.is_empty() {
        return Err(PipelineError::NoSuchSession {
            session: session.clone(),
        });
    }

    let ordered = order_map(dedup_markers(rows));
    write_table(output, &ordered)?;
    Ok(ordered)
}

#[cfg(test)]
#[path = "map_test.rs"]
mod tests;
