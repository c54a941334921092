//! Experiment store: runs the extraction pipeline and serves its results

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use mq_core::ids::is_path_component;
use mq_core::schema::MATRIX_FILE;
use mq_core::{
    AnalysisSession, Config, ExperimentId, ExperimentParams, MapRow, MapWithQtlRow, QtlRow,
    QtlWithMarkerRow, SessionId, TableSchema,
};
use mq_pipeline::{MapQtlToolkit, QtlToolkit, Workspace};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{ErrorKind, StoreError, StoreResult};
use crate::lock::ParamLocks;
use crate::metadata::{ExperimentInfo, ExperimentRecord, METADATA_FILE};
use crate::repository::{ExperimentRepository, FsRepository, Session};

/// Result of [`ExperimentStore::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The pipeline ran and produced a new experiment
    Created(ExperimentId),
    /// An experiment with the same parameters already existed
    Existing(ExperimentId),
}

impl RunOutcome {
    pub fn experiment_id(&self) -> &ExperimentId {
        match self {
            RunOutcome::Created(id) | RunOutcome::Existing(id) => id,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, RunOutcome::Created(_))
    }
}

/// Filesystem-rooted store of upload sessions and their experiments.
pub struct ExperimentStore<R = FsRepository, T = MapQtlToolkit> {
    config: Config,
    repository: R,
    toolkit: T,
    locks: ParamLocks,
}

impl ExperimentStore {
    /// Open the store rooted at the configured upload folder, creating it if needed.
    pub fn open(config: Config) -> StoreResult<Self> {
        config.validate()?;
        fs::create_dir_all(&config.upload_folder)
            .map_err(|e| StoreError::io(&config.upload_folder, e))?;
        let repository = FsRepository::new(config.upload_folder.clone());
        Ok(Self::with_parts(config, repository, MapQtlToolkit))
    }
}

impl<R: ExperimentRepository, T: QtlToolkit> ExperimentStore<R, T> {
    /// Assemble a store from its repository and toolkit.
    pub fn with_parts(config: Config, repository: R, toolkit: T) -> Self {
        Self {
            config,
            repository,
            toolkit,
            locks: ParamLocks::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Store an uploaded archive, and optionally a JoinMap map, as a new session.
    pub fn create_session(&self, archive: &Path, joinmap: Option<&Path>) -> StoreResult<Session> {
        self.repository.create_session(archive, joinmap)
    }

    pub fn session(&self, session: &SessionId) -> StoreResult<Session> {
        self.repository.session(session)
    }

    pub fn list_sessions(&self) -> StoreResult<Vec<SessionId>> {
        self.repository.list_sessions()
    }

    /// Analysis sessions available in the archive of `session`, sorted.
    pub fn analysis_sessions(&self, session: &SessionId) -> StoreResult<Vec<AnalysisSession>> {
        let session = self.repository.session(session)?;
        let workspace = Workspace::extract(&session.archive)?;
        Ok(self.toolkit.analysis_sessions(workspace.path())?)
    }

    /// Experiment of `session` already run with exactly `params`, if any.
    pub fn find_duplicate(
        &self,
        session: &SessionId,
        params: &ExperimentParams,
    ) -> StoreResult<Option<ExperimentId>> {
        self.repository.find(session, params)
    }

    /// Run the pipeline for `params`, or return the experiment that already has them.
    ///
    /// A failed run leaves nothing behind: the staging directory and the
    /// extraction workspace are both removed before the error is returned.
    pub fn run(&self, session: &SessionId, params: &ExperimentParams) -> StoreResult<RunOutcome> {
        self.locks
            .with_lock(session, params, || self.run_locked(session, params))
    }

    fn run_locked(&self, session: &SessionId, params: &ExperimentParams) -> StoreResult<RunOutcome> {
        let session = self.repository.session(session)?;
        if let Some(existing) = self.repository.find(&session.id, params)? {
            log::info!("Experiment {existing} already run with {params}");
            return Ok(RunOutcome::Existing(existing));
        }

        let experiment = self.unused_experiment_id(&session.id, ExperimentId::generate(params));
        log::info!("Running experiment {experiment} ({params})");
        let staging = self.repository.create(&session.id, &experiment)?;

        let committed = self
            .build(&session, params, &experiment, &staging)
            .and_then(|record| {
                self.repository.commit(&session.id, &experiment)?;
                Ok(record)
            });

        match committed {
            Ok(record) => {
                log::info!(
                    "Experiment {experiment} created: {} markers, {} traits",
                    record.marker_count,
                    record.trait_count
                );
                Ok(RunOutcome::Created(experiment))
            }
            Err(e) => {
                if let Err(cleanup) = self.repository.discard(&session.id, &experiment) {
                    log::error!("Failed to roll back experiment {experiment}: {cleanup}");
                }
                match e.kind() {
                    ErrorKind::NoResults => {
                        log::warn!("No QTL matrix for session {} with {params}", session.id)
                    }
                    ErrorKind::Integrity => {
                        log::error!("Experiment {experiment} rolled back, data integrity fault: {e}")
                    }
                    _ => log::error!("Experiment {experiment} rolled back: {e}"),
                }
                Err(e)
            }
        }
    }

    /// Append a numeric suffix while `base` names an existing experiment.
    fn unused_experiment_id(&self, session: &SessionId, base: ExperimentId) -> ExperimentId {
        let mut candidate = base.clone();
        let mut n = 1;
        while self.repository.experiment_dir(session, &candidate).is_ok() {
            n += 1;
            candidate = base.with_suffix(n);
        }
        if n > 1 {
            log::debug!("Experiment id {base} taken, using {candidate}");
        }
        candidate
    }

    fn build(
        &self,
        session: &Session,
        params: &ExperimentParams,
        experiment: &ExperimentId,
        staging: &Path,
    ) -> StoreResult<ExperimentRecord> {
        let workspace = Workspace::extract(&session.archive)?;
        let map = staging.join(MapRow::FILE_NAME);
        let qtls = staging.join(QtlRow::FILE_NAME);
        let qtls_with_marker = staging.join(QtlWithMarkerRow::FILE_NAME);

        let markers = self.toolkit.generate_map(
            workspace.path(),
            &params.mapqtl_session,
            session.joinmap.as_deref(),
            &map,
        )?;
        log::debug!("Map of {experiment} has {} markers", markers.len());

        let summary = self.toolkit.parse_qtls(
            workspace.path(),
            &params.mapqtl_session,
            params.lod_threshold,
            &qtls,
            &staging.join(MATRIX_FILE),
        )?;

        self.toolkit
            .add_marker_to_qtls(&qtls, &map, &qtls_with_marker)?;
        let rows = self.toolkit.add_qtl_to_map(
            &qtls_with_marker,
            &map,
            &staging.join(MapWithQtlRow::FILE_NAME),
        )?;
        log::debug!("Joined {} QTLs onto {rows} map rows", summary.qtl_count);

        let record = ExperimentRecord::new(
            experiment.clone(),
            session.id.clone(),
            params,
            summary.marker_count,
            summary.trait_count,
        );
        record.save(staging)?;
        Ok(record)
    }

    /// Zip bundle of the experiment's output files, built on first request.
    ///
    /// Later calls return the existing bundle as is, even if files were added
    /// to the experiment since.
    pub fn package(&self, session: &SessionId, experiment: &ExperimentId) -> StoreResult<PathBuf> {
        let dir = self.repository.experiment_dir(session, experiment)?;
        let archive_name = format!("{experiment}.zip");
        let archive = dir.join(&archive_name);
        if archive.is_file() {
            log::debug!("Reusing package {}", archive.display());
            return Ok(archive);
        }

        let files = output_files(&dir)?;
        let temp_path = dir.join(format!(".{archive_name}.tmp"));
        if let Err(e) = write_package(experiment, &dir, &files, &temp_path) {
            // Best-effort removal; the package error is what matters
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }
        fs::rename(&temp_path, &archive).map_err(|e| StoreError::io(&archive, e))?;

        log::info!("Packaged {} files into {}", files.len(), archive.display());
        Ok(archive)
    }

    pub fn list_experiments(&self, session: &SessionId) -> StoreResult<Vec<ExperimentId>> {
        self.repository.list(session)
    }

    pub fn experiment_info(
        &self,
        session: &SessionId,
        experiment: &ExperimentId,
    ) -> StoreResult<ExperimentInfo> {
        self.repository.info(session, experiment)
    }

    /// Names of the experiment's files, the metadata record excluded.
    pub fn experiment_files(
        &self,
        session: &SessionId,
        experiment: &ExperimentId,
    ) -> StoreResult<Vec<String>> {
        let dir = self.repository.experiment_dir(session, experiment)?;
        let mut names = file_names(&dir)?;
        names.retain(|name| name != METADATA_FILE);
        Ok(names)
    }

    /// Path of one of the experiment's files.
    pub fn experiment_file(
        &self,
        session: &SessionId,
        experiment: &ExperimentId,
        name: &str,
    ) -> StoreResult<PathBuf> {
        let not_found = || StoreError::FileNotFound {
            experiment: experiment.clone(),
            name: name.to_string(),
        };
        if !is_path_component(name) {
            return Err(not_found());
        }
        if !self
            .experiment_files(session, experiment)?
            .iter()
            .any(|file| file == name)
        {
            return Err(not_found());
        }
        Ok(self.repository.experiment_dir(session, experiment)?.join(name))
    }
}

/// Visible regular files of `dir`, sorted by name.
fn file_names(dir: &Path) -> StoreResult<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| StoreError::io(dir, e))? {
        let entry = entry.map_err(|e| StoreError::io(dir, e))?;
        if !entry.path().is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if !name.starts_with('.') {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Files that go into a package: everything but archives.
fn output_files(dir: &Path) -> StoreResult<Vec<String>> {
    let mut names = file_names(dir)?;
    names.retain(|name| !name.ends_with(".zip"));
    Ok(names)
}

fn write_package(
    experiment: &ExperimentId,
    dir: &Path,
    files: &[String],
    target: &Path,
) -> StoreResult<()> {
    let package_err = |source| StoreError::Package {
        experiment: experiment.clone(),
        source,
    };

    let file = File::create(target).map_err(|e| StoreError::io(target, e))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for name in files {
        let path = dir.join(name);
        let mut source = File::open(&path).map_err(|e| StoreError::io(&path, e))?;
        zip.start_file(format!("{experiment}/{name}"), options)
            .map_err(package_err)?;
        io::copy(&mut source, &mut zip).map_err(|e| StoreError::io(&path, e))?;
    }
    zip.finish().map_err(package_err)?;
    Ok(())
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
