//! QTL toolkit trait definition

use std::path::Path;

use mq_core::{read_table, write_table, AnalysisSession, MapRow, QtlRow, QtlWithMarkerRow};

use crate::error::PipelineResult;
use crate::join;
use crate::qtl::QtlSummary;

/// File-in/file-out pipeline stages run by the experiment store.
///
/// Every stage reads from the extracted workspace or from tables written by an
/// earlier stage, and writes its own table to the given output path.
pub trait QtlToolkit: Send + Sync {
    /// Analysis sessions available in an extracted archive, sorted
    fn analysis_sessions(&self, workspace: &Path) -> PipelineResult<Vec<AnalysisSession>>;

    /// Write the canonical map of `session` to `output`
    fn generate_map(
        &self,
        workspace: &Path,
        session: &AnalysisSession,
        joinmap: Option<&Path>,
        output: &Path,
    ) -> PipelineResult<Vec<MapRow>>;

    /// Write the QTL table and the QTL-by-marker matrix of `session` at `threshold`
    fn parse_qtls(
        &self,
        workspace: &Path,
        session: &AnalysisSession,
        threshold: f64,
        qtl_output: &Path,
        matrix_output: &Path,
    ) -> PipelineResult<QtlSummary>;

    /// Join the QTL table with the map, returns the number of rows written
    fn add_marker_to_qtls(
        &self,
        qtl_table: &Path,
        map_table: &Path,
        output: &Path,
    ) -> PipelineResult<usize> {
        let qtls: Vec<QtlRow> = read_table(qtl_table)?;
        let map: Vec<MapRow> = read_table(map_table)?;
        let joined = join::add_marker_to_qtls(&qtls, &map)?;
        write_table(output, &joined)?;
        Ok(joined.len())
    }

    /// Fold the marker-resolved QTLs onto the map, returns the number of rows written
    fn add_qtl_to_map(
        &self,
        qtl_with_marker_table: &Path,
        map_table: &Path,
        output: &Path,
    ) -> PipelineResult<usize> {
        let qtls: Vec<QtlWithMarkerRow> = read_table(qtl_with_marker_table)?;
        let map: Vec<MapRow> = read_table(map_table)?;
        let rows = join::add_qtl_to_map(&qtls, &map);
        write_table(output, &rows)?;
        Ok(rows.len())
    }
}

/// Toolkit reading MapQTL `.mqo` output and JoinMap map files.
#[derive(Debug, Default, Clone, Copy)]
pub struct MapQtlToolkit;

impl QtlToolkit for MapQtlToolkit {
    fn analysis_sessions(&self, workspace: &Path) -> PipelineResult<Vec<AnalysisSession>> {
        crate::sessions::enumerate_sessions(workspace)
    }

    fn generate_map(
        &self,
        workspace: &Path,
        session: &AnalysisSession,
        joinmap: Option<&Path>,
        output: &Path,
    ) -> PipelineResult<Vec<MapRow>> {
        crate::map::generate_map(workspace, session, joinmap, output)
    }

    fn parse_qtls(
        &self,
        workspace: &Path,
        session: &AnalysisSession,
        threshold: f64,
        qtl_output: &Path,
        matrix_output: &Path,
    ) -> PipelineResult<QtlSummary> {
        crate::qtl::parse_qtls(workspace, session, threshold, qtl_output, matrix_output)
    }
}
