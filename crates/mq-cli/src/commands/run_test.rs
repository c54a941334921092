use super::*;
use mq_core::Config;
use mq_pipeline::test_utils::write_demo_archive;
use mq_store::{ErrorKind, ExperimentStore};
use tempfile::tempdir;

#[test]
fn test_run_is_idempotent() {
    let dir = tempdir().unwrap();
    let uploads = dir.path().join("uploads");
    let store = ExperimentStore::open(Config::with_upload_folder(&uploads)).unwrap();
    let archive = write_demo_archive(&dir.path().join("demo.zip"));
    let session = store.create_session(&archive, None).unwrap();

    let global = GlobalArgs {
        verbose: false,
        config: None,
        upload_folder: Some(uploads.display().to_string()),
    };
    let args = RunArgs {
        session: session.id.to_string(),
        lod: "3.0".to_string(),
        mapqtl_session: "2".to_string(),
    };

    execute(&args, &global).unwrap();
    execute(&args, &global).unwrap();

    assert_eq!(store.list_experiments(&session.id).unwrap().len(), 1);
}

#[test]
fn test_run_rejects_bad_threshold() {
    let dir = tempdir().unwrap();
    let global = GlobalArgs {
        verbose: false,
        config: None,
        upload_folder: Some(dir.path().display().to_string()),
    };
    let args = RunArgs {
        session: "20240101000000000000ABC".to_string(),
        lod: "three".to_string(),
        mapqtl_session: "2".to_string(),
    };

    let err = execute(&args, &global).unwrap_err();
    assert_eq!(
        err.downcast_ref::<StoreError>().unwrap().kind(),
        ErrorKind::InvalidInput
    );
}

#[test]
fn test_run_unknown_session_is_not_found() {
    let dir = tempdir().unwrap();
    let global = GlobalArgs {
        verbose: false,
        config: None,
        upload_folder: Some(dir.path().display().to_string()),
    };
    let args = RunArgs {
        session: "20240101000000000000ABC".to_string(),
        lod: "3.0".to_string(),
        mapqtl_session: "2".to_string(),
    };

    let err = execute(&args, &global).unwrap_err();
    assert_eq!(
        err.downcast_ref::<StoreError>().unwrap().kind(),
        ErrorKind::NotFound
    );
}
