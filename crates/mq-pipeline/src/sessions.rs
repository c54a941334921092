//! Discovery of MapQTL analysis sessions inside an extracted archive
//!
//! MapQTL writes one output file per trait and run, named
//! `Session <label> (<method>)_<trait>.mqo`. The files may sit at any depth of
//! the archive.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

use mq_core::AnalysisSession;

use crate::error::{PipelineError, PipelineResult};

/// File-name prefix of MapQTL output files.
const SESSION_PREFIX: &str = "Session ";

/// Extension of MapQTL output files.
const MQO_EXTENSION: &str = "mqo";

/// List every MapQTL output file below `workspace`, sorted by path.
pub fn mapqtl_files(workspace: &Path) -> PipelineResult<Vec<PathBuf>> {
    let root = glob::Pattern::escape(&workspace.display().to_string());
    let pattern = format!("{root}/**/{SESSION_PREFIX}*.{MQO_EXTENSION}");
    let paths = glob::glob(&pattern).map_err(|e| {
        PipelineError::io(workspace, io::Error::new(io::ErrorKind::InvalidInput, e))
    })?;

    let mut files = Vec::new();
    for entry in paths {
        let path = entry.map_err(|e| {
            let path = e.path().to_path_buf();
            PipelineError::io(&path, e.into_error())
        })?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Analysis-session label encoded in a MapQTL output file name.
pub fn session_label(path: &Path) -> Option<AnalysisSession> {
    let stem = path.file_stem()?.to_str()?;
    let rest = stem.strip_prefix(SESSION_PREFIX)?;
    let token = rest.split_whitespace().next()?;
    let label = token.split(['(', '_']).next()?;
    AnalysisSession::parse(label).ok()
}

/// Sorted, deduplicated analysis sessions found in `workspace`.
///
/// An archive without any MapQTL output yields an empty list.
pub fn enumerate_sessions(workspace: &Path) -> PipelineResult<Vec<AnalysisSession>> {
    let sessions: BTreeSet<AnalysisSession> = mapqtl_files(workspace)?
        .iter()
        .filter_map(|path| session_label(path))
        .collect();
    Ok(sessions.into_iter().collect())
}

/// MapQTL output files of one analysis session, sorted by file name.
pub fn session_files(workspace: &Path, session: &AnalysisSession) -> PipelineResult<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = mapqtl_files(workspace)?
        .into_iter()
        .filter(|path| session_label(path).as_ref() == Some(session))
        .collect();
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

#[cfg(test)]
#[path = "sessions_test.rs"]
mod tests;
