use super::*;
use crate::metadata::ExperimentRecord;
use tempfile::tempdir;

fn upload(dir: &Path) -> PathBuf {
    let archive = dir.join("upload.zip");
    fs::write(&archive, b"zip bytes").unwrap();
    archive
}

fn params(lod: f64) -> ExperimentParams {
    ExperimentParams::from_strings(&lod.to_string(), "2").unwrap()
}

/// Commit an experiment holding only its metadata record.
fn commit_experiment(
    repo: &FsRepository,
    session: &SessionId,
    id: &str,
    params: &ExperimentParams,
) -> ExperimentId {
    let experiment = ExperimentId::parse(id).unwrap();
    let staging = repo.create(session, &experiment).unwrap();
    ExperimentRecord::new(experiment.clone(), session.clone(), params, 1, 1)
        .save(&staging)
        .unwrap();
    repo.commit(session, &experiment).unwrap();
    experiment
}

#[test]
fn test_create_session_stores_archive_and_map() {
    let dir = tempdir().unwrap();
    let repo = FsRepository::new(dir.path().join("uploads"));
    let joinmap = dir.path().join("linkage.map");
    fs::write(&joinmap, "group 1\nM1 0.0\n").unwrap();

    let session = repo.create_session(&upload(dir.path()), Some(&joinmap)).unwrap();

    assert_eq!(fs::read(&session.archive).unwrap(), b"zip bytes");
    assert_eq!(session.archive.file_name().unwrap(), ARCHIVE_FILE);
    assert_eq!(session.joinmap.as_deref(), Some(session.dir.join(JOINMAP_FILE).as_path()));
    assert!(session.created_at().is_some());
    assert_eq!(repo.session(&session.id).unwrap(), session);
    assert_eq!(repo.list_sessions().unwrap(), vec![session.id.clone()]);
}

#[test]
fn test_create_session_without_archive_leaves_nothing() {
    let dir = tempdir().unwrap();
    let repo = FsRepository::new(dir.path().join("uploads"));

    let err = repo
        .create_session(&dir.path().join("absent.zip"), None)
        .unwrap_err();

    assert!(matches!(err, StoreError::InvalidUpload { .. }));
    assert!(repo.list_sessions().unwrap().is_empty());
}

#[test]
fn test_unknown_session_is_not_found() {
    let dir = tempdir().unwrap();
    let repo = FsRepository::new(dir.path());
    let session = SessionId::parse("20240101000000000000ABC").unwrap();

    assert!(matches!(
        repo.session(&session).unwrap_err(),
        StoreError::SessionNotFound { .. }
    ));
    assert!(matches!(
        repo.list(&session).unwrap_err(),
        StoreError::SessionNotFound { .. }
    ));
}

#[test]
fn test_list_sessions_skips_files_and_foreign_names() {
    let dir = tempdir().unwrap();
    let repo = FsRepository::new(dir.path());
    fs::create_dir(dir.path().join("20240101000000000000ABC")).unwrap();
    fs::create_dir(dir.path().join(".hidden")).unwrap();
    fs::write(dir.path().join("20240102000000000000ABC"), "file").unwrap();

    let sessions = repo.list_sessions().unwrap();
    assert_eq!(sessions, vec!["20240101000000000000ABC"]);
}

#[test]
fn test_missing_root_lists_no_sessions() {
    let dir = tempdir().unwrap();
    let repo = FsRepository::new(dir.path().join("never-created"));
    assert!(repo.list_sessions().unwrap().is_empty());
}

#[test]
fn test_staged_experiment_is_invisible_until_commit() {
    let dir = tempdir().unwrap();
    let repo = FsRepository::new(dir.path().join("uploads"));
    let session = repo.create_session(&upload(dir.path()), None).unwrap();
    let experiment = ExperimentId::parse("20240101120000_s2_lod3.0").unwrap();

    let staging = repo.create(&session.id, &experiment).unwrap();
    assert!(staging.is_dir());
    assert!(repo.list(&session.id).unwrap().is_empty());
    assert!(repo.experiment_dir(&session.id, &experiment).is_err());

    let committed = repo.commit(&session.id, &experiment).unwrap();
    assert!(committed.is_dir());
    assert!(!staging.exists());
    assert_eq!(repo.list(&session.id).unwrap(), vec![experiment]);
}

#[test]
fn test_commit_never_replaces_an_existing_experiment() {
    let dir = tempdir().unwrap();
    let repo = FsRepository::new(dir.path().join("uploads"));
    let session = repo.create_session(&upload(dir.path()), None).unwrap();
    let experiment = ExperimentId::parse("20240101120000_s2_lod3.0").unwrap();

    // An empty directory is what rename() would overwrite without complaint
    let existing = session.dir.join(experiment.as_str());
    fs::create_dir(&existing).unwrap();
    let staging = repo.create(&session.id, &experiment).unwrap();
    fs::write(staging.join("map.csv"), "Marker,Group,Position\n").unwrap();

    let err = repo.commit(&session.id, &experiment).unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }));
    assert!(staging.is_dir());
    assert!(!existing.join("map.csv").exists());
}

#[test]
fn test_discard_removes_staging() {
    let dir = tempdir().unwrap();
    let repo = FsRepository::new(dir.path().join("uploads"));
    let session = repo.create_session(&upload(dir.path()), None).unwrap();
    let experiment = ExperimentId::parse("20240101120000_s2_lod3.0").unwrap();

    let staging = repo.create(&session.id, &experiment).unwrap();
    fs::write(staging.join("map.csv"), "Marker,Group,Position\n").unwrap();

    repo.discard(&session.id, &experiment).unwrap();
    assert!(!staging.exists());
    // Discarding twice is harmless
    repo.discard(&session.id, &experiment).unwrap();
}

#[test]
fn test_find_matches_exact_parameters_only() {
    let dir = tempdir().unwrap();
    let repo = FsRepository::new(dir.path().join("uploads"));
    let session = repo.create_session(&upload(dir.path()), None).unwrap();

    let three = commit_experiment(&repo, &session.id, "20240101120000_s2_lod3.0", &params(3.0));
    commit_experiment(&repo, &session.id, "20240101120500_s2_lod4.5", &params(4.5));

    assert_eq!(repo.find(&session.id, &params(3.0)).unwrap(), Some(three));
    assert_eq!(repo.find(&session.id, &params(3.000001)).unwrap(), None);

    let other_session = ExperimentParams::from_strings("3.0", "1").unwrap();
    assert_eq!(repo.find(&session.id, &other_session).unwrap(), None);
}

#[test]
fn test_find_skips_experiments_with_damaged_metadata() {
    let dir = tempdir().unwrap();
    let repo = FsRepository::new(dir.path().join("uploads"));
    let session = repo.create_session(&upload(dir.path()), None).unwrap();
    let experiment = ExperimentId::parse("20240101120000_s2_lod3.0").unwrap();
    repo.create(&session.id, &experiment).unwrap();
    repo.commit(&session.id, &experiment).unwrap();

    assert_eq!(repo.find(&session.id, &params(3.0)).unwrap(), None);
}
