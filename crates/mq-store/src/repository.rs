//! Filesystem-backed repository of upload sessions and their experiments
//!
//! ```text
//! <upload_folder>/
//!   <session_id>/
//!     input.zip
//!     map                      (optional JoinMap file)
//!     <experiment_id>/         (committed experiment)
//!     .<experiment_id>.partial (experiment being built)
//! ```

use chrono::NaiveDateTime;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use mq_core::{ExperimentId, ExperimentParams, SessionId};

use crate::error::{StoreError, StoreResult};
use crate::metadata::ExperimentInfo;

/// File name of the stored upload archive inside a session directory
pub const ARCHIVE_FILE: &str = "input.zip";

/// File name of the stored JoinMap map inside a session directory
pub const JOINMAP_FILE: &str = "map";

/// An upload session as stored on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: SessionId,
    pub dir: PathBuf,
    pub archive: PathBuf,
    pub joinmap: Option<PathBuf>,
}

impl Session {
    /// Upload time decoded from the session id.
    pub fn created_at(&self) -> Option<NaiveDateTime> {
        self.id.created_at()
    }
}

/// Storage primitives used by the experiment store.
pub trait ExperimentRepository: Send + Sync {
    /// Look up an upload session
    fn session(&self, session: &SessionId) -> StoreResult<Session>;

    /// Store an uploaded archive, and optionally a JoinMap map, as a new session
    fn create_session(&self, archive: &Path, joinmap: Option<&Path>) -> StoreResult<Session>;

    /// All upload sessions, sorted
    fn list_sessions(&self) -> StoreResult<Vec<SessionId>>;

    /// Delete a session with all its experiments
    fn remove_session(&self, session: &SessionId) -> StoreResult<()>;

    /// Committed experiments of a session, sorted
    fn list(&self, session: &SessionId) -> StoreResult<Vec<ExperimentId>>;

    /// Directory of a committed experiment
    fn experiment_dir(&self, session: &SessionId, experiment: &ExperimentId)
        -> StoreResult<PathBuf>;

    /// Metadata of a committed experiment
    fn info(&self, session: &SessionId, experiment: &ExperimentId) -> StoreResult<ExperimentInfo> {
        let dir = self.experiment_dir(session, experiment)?;
        Ok(ExperimentInfo::read(&dir, experiment.clone()))
    }

    /// Committed experiment of a session run with exactly `params`
    fn find(
        &self,
        session: &SessionId,
        params: &ExperimentParams,
    ) -> StoreResult<Option<ExperimentId>> {
        for experiment in self.list(session)? {
            let info = self.info(session, &experiment)?;
            if info.params().as_ref() == Some(params) {
                return Ok(Some(experiment));
            }
        }
        Ok(None)
    }

    /// Create the empty staging directory of a new experiment
    fn create(&self, session: &SessionId, experiment: &ExperimentId) -> StoreResult<PathBuf>;

    /// Publish a staged experiment, returning its final directory.
    /// Fails if an experiment with the same id already exists.
    fn commit(&self, session: &SessionId, experiment: &ExperimentId) -> StoreResult<PathBuf>;

    /// Delete a staged experiment
    fn discard(&self, session: &SessionId, experiment: &ExperimentId) -> StoreResult<()>;
}

/// Repository rooted at the configured upload folder.
#[derive(Debug, Clone)]
pub struct FsRepository {
    root: PathBuf,
}

fn sorted_dir_names<T>(dir: &Path, parse: impl Fn(&str) -> Option<T>) -> StoreResult<Vec<T>>
where
    T: Ord,
{
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(StoreError::io(dir, e)),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| StoreError::io(dir, e))?;
        if !entry.path().is_dir() {
            continue;
        }
        if let Some(parsed) = entry.file_name().to_str().and_then(&parse) {
            names.push(parsed);
        }
    }
    names.sort();
    Ok(names)
}

impl FsRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn session_dir(&self, session: &SessionId) -> PathBuf {
        self.root.join(session.as_str())
    }

    fn staging_dir(&self, session: &SessionId, experiment: &ExperimentId) -> PathBuf {
        self.session_dir(session)
            .join(format!(".{experiment}.partial"))
    }

    fn copy_into(source: &Path, target: &Path) -> StoreResult<()> {
        if !source.is_file() {
            return Err(StoreError::InvalidUpload {
                path: source.display().to_string(),
                message: "not a readable file".to_string(),
            });
        }
        fs::copy(source, target).map_err(|e| StoreError::io(source, e))?;
        Ok(())
    }
}

impl ExperimentRepository for FsRepository {
    fn session(&self, session: &SessionId) -> StoreResult<Session> {
        let dir = self.session_dir(session);
        let archive = dir.join(ARCHIVE_FILE);
        if !archive.is_file() {
            return Err(StoreError::SessionNotFound {
                session: session.to_string(),
            });
        }
        let joinmap = Some(dir.join(JOINMAP_FILE)).filter(|p| p.is_file());
        Ok(Session {
            id: session.clone(),
            dir,
            archive,
            joinmap,
        })
    }

    fn create_session(&self, archive: &Path, joinmap: Option<&Path>) -> StoreResult<Session> {
        let id = SessionId::generate();
        let dir = self.session_dir(&id);
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;

        let stored = Self::copy_into(archive, &dir.join(ARCHIVE_FILE)).and_then(|()| {
            match joinmap {
                Some(map) => Self::copy_into(map, &dir.join(JOINMAP_FILE)),
                None => Ok(()),
            }
        });
        if let Err(e) = stored {
            if let Err(cleanup) = fs::remove_dir_all(&dir) {
                log::warn!("Failed to remove incomplete session {}: {cleanup}", dir.display());
            }
            return Err(e);
        }

        log::info!("Created session {id}");
        self.session(&id)
    }

    fn list_sessions(&self) -> StoreResult<Vec<SessionId>> {
        sorted_dir_names(&self.root, |name| SessionId::parse(name).ok())
    }

    fn remove_session(&self, session: &SessionId) -> StoreResult<()> {
        let dir = self.session_dir(session);
        fs::remove_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))
    }

    fn list(&self, session: &SessionId) -> StoreResult<Vec<ExperimentId>> {
        let dir = self.session_dir(session);
        if !dir.is_dir() {
            return Err(StoreError::SessionNotFound {
                session: session.to_string(),
            });
        }
        sorted_dir_names(&dir, |name| ExperimentId::parse(name).ok())
    }

    fn experiment_dir(
        &self,
        session: &SessionId,
        experiment: &ExperimentId,
    ) -> StoreResult<PathBuf> {
        let dir = self.session_dir(session).join(experiment.as_str());
        if dir.is_dir() {
            Ok(dir)
        } else {
            Err(StoreError::ExperimentNotFound {
                session: session.clone(),
                experiment: experiment.to_string(),
            })
        }
    }

    fn create(&self, session: &SessionId, experiment: &ExperimentId) -> StoreResult<PathBuf> {
        let staging = self.staging_dir(session, experiment);
        if staging.exists() {
            log::warn!("Removing stale staging directory {}", staging.display());
            fs::remove_dir_all(&staging).map_err(|e| StoreError::io(&staging, e))?;
        }
        fs::create_dir_all(&staging).map_err(|e| StoreError::io(&staging, e))?;
        Ok(staging)
    }

    fn commit(&self, session: &SessionId, experiment: &ExperimentId) -> StoreResult<PathBuf> {
        let staging = self.staging_dir(session, experiment);
        let target = self.session_dir(session).join(experiment.as_str());
        // rename() would silently replace an empty directory
        if target.exists() {
            return Err(StoreError::io(
                &target,
                io::Error::new(io::ErrorKind::AlreadyExists, "experiment already exists"),
            ));
        }
        fs::rename(&staging, &target).map_err(|e| StoreError::io(&target, e))?;
        Ok(target)
    }

    fn discard(&self, session: &SessionId, experiment: &ExperimentId) -> StoreResult<()> {
        let staging = self.staging_dir(session, experiment);
        match fs::remove_dir_all(&staging) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(&staging, e)),
        }
    }
}

#[cfg(test)]
#[path = "repository_test.rs"]
mod tests;
