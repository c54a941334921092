//! Archive extraction into a scoped temporary workspace

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::{PipelineError, PipelineResult};

/// A private temporary directory holding an extracted archive.
///
/// The directory and everything in it is removed when the workspace is
/// dropped, whichever way the owning scope is left.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create an empty workspace.
    pub fn new() -> PipelineResult<Self> {
        let dir = tempfile::Builder::new()
            .prefix("mq2-")
            .tempdir()
            .map_err(|e| PipelineError::io(&std::env::temp_dir(), e))?;
        Ok(Self { dir })
    }

    /// Create a workspace and extract `archive` into it.
    pub fn extract(archive: &Path) -> PipelineResult<Self> {
        let workspace = Self::new()?;
        let count = extract_zip(archive, workspace.path())?;
        log::debug!(
            "Extracted {count} files from {} into {}",
            archive.display(),
            workspace.path().display()
        );
        Ok(workspace)
    }

    /// Root of the extracted tree.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

fn extraction_error(archive: &Path, source: ZipError) -> PipelineError {
    PipelineError::Extraction {
        path: archive.display().to_string(),
        source,
    }
}

/// Extract every entry of the zip `archive` below `dest`.
///
/// Returns the number of files written. Entries that would land outside
/// `dest` are rejected. Cleaning up `dest` is the caller's job on both
/// success and failure.
pub fn extract_zip(archive: &Path, dest: &Path) -> PipelineResult<usize> {
    let file = File::open(archive).map_err(|e| extraction_error(archive, ZipError::Io(e)))?;
    let mut zip = ZipArchive::new(file).map_err(|e| extraction_error(archive, e))?;

    let mut written = 0;
    for index in 0..zip.len() {
        let mut entry = zip
            .by_index(index)
            .map_err(|e| extraction_error(archive, e))?;
        let relative: PathBuf = entry
            .enclosed_name()
            .ok_or_else(|| PipelineError::UnsafeEntry {
                entry: entry.name().to_string(),
            })?;
        let target = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(|e| PipelineError::io(&target, e))?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
        }
        let mut out = File::create(&target).map_err(|e| PipelineError::io(&target, e))?;
        io::copy(&mut entry, &mut out).map_err(|e| extraction_error(archive, ZipError::Io(e)))?;
        written += 1;
    }

    Ok(written)
}

#[cfg(test)]
#[path = "archive_test.rs"]
mod tests;
