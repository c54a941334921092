//! Joiner: links QTL peaks to map markers and folds QTL counts back onto the map
//!
//! Both stages are total over their inputs. The first either resolves every
//! QTL or fails; the second emits exactly one row per map marker.

use std::collections::HashMap;

use mq_core::{MapRow, MapWithQtlRow, QtlRow, QtlWithMarkerRow};

use crate::error::{PipelineError, PipelineResult};

/// Map markers indexed by name and by linkage group.
struct MapIndex<'a> {
    by_name: HashMap<&'a str, &'a MapRow>,
    by_group: HashMap<&'a str, Vec<&'a MapRow>>,
}

impl<'a> MapIndex<'a> {
    fn new(map: &'a [MapRow]) -> Self {
        let mut by_name = HashMap::new();
        let mut by_group: HashMap<&str, Vec<&MapRow>> = HashMap::new();
        for row in map {
            by_name.entry(row.marker.as_str()).or_insert(row);
            by_group.entry(row.group.as_str()).or_default().push(row);
        }
        Self { by_name, by_group }
    }

    /// Marker of `group` closest to `position`, the lower one on ties.
    fn nearest(&self, group: &str, position: f64) -> Option<&'a MapRow> {
        let mut best: Option<(f64, &MapRow)> = None;
        for &row in self.by_group.get(group)? {
            let distance = (row.position - position).abs();
            let closer = match best {
                None => true,
                Some((d, b)) => distance < d || (distance == d && row.position < b.position),
            };
            if closer {
                best = Some((distance, row));
            }
        }
        best.map(|(_, row)| row)
    }

    fn resolve(&self, qtl: &QtlRow) -> Option<&'a MapRow> {
        if qtl.is_on_marker() {
            self.by_name.get(qtl.locus.trim()).copied()
        } else {
            self.nearest(&qtl.group, qtl.position)
        }
    }
}

/// Attach to every QTL the map marker it sits on or is closest to.
///
/// A QTL on a marker the map does not know, or in a linkage group the map
/// does not have, fails with [`PipelineError::UnknownMarker`].
pub fn add_marker_to_qtls(qtls: &[QtlRow], map: &[MapRow]) -> PipelineResult<Vec<QtlWithMarkerRow>> {
    let index = MapIndex::new(map);
    qtls.iter()
        .map(|qtl| {
            let marker = index
                .resolve(qtl)
                .ok_or_else(|| PipelineError::UnknownMarker {
                    trait_name: qtl.trait_name.clone(),
                    locus: qtl.locus.clone(),
                    group: qtl.group.clone(),
                })?;
            Ok(QtlWithMarkerRow::from_qtl(qtl, marker.marker.as_str()))
        })
        .collect()
}

/// Count the QTLs of every map marker, `#` for markers without any.
///
/// The output has one row per map row, in map order.
pub fn add_qtl_to_map(qtls: &[QtlWithMarkerRow], map: &[MapRow]) -> Vec<MapWithQtlRow> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for qtl in qtls {
        *counts.entry(qtl.marker.as_str()).or_default() += 1;
    }

    map.iter()
        .map(|row| MapWithQtlRow::new(row, counts.get(row.marker.as_str()).copied().unwrap_or(0)))
        .collect()
}

#[cfg(test)]
#[path = "join_test.rs"]
mod tests;
