use super::*;
use mq_core::Config;
use mq_pipeline::test_utils::{write_demo_archive, write_zip};
use mq_store::ExperimentStore;
use std::path::Path;
use tempfile::tempdir;

fn global_for(uploads: &Path) -> GlobalArgs {
    GlobalArgs {
        verbose: false,
        config: None,
        upload_folder: Some(uploads.display().to_string()),
    }
}

#[test]
fn test_archive_without_mapqtl_output_is_not_an_error() {
    let dir = tempdir().unwrap();
    let uploads = dir.path().join("uploads");
    let store = ExperimentStore::open(Config::with_upload_folder(&uploads)).unwrap();
    let archive = dir.path().join("readme.zip");
    write_zip(&archive, &[("project/README.txt".to_string(), b"no results".to_vec())]);
    let session = store.create_session(&archive, None).unwrap();

    assert!(store.analysis_sessions(&session.id).unwrap().is_empty());
    let args = SessionsArgs {
        session: session.id.to_string(),
    };
    execute(&args, &global_for(&uploads)).unwrap();
}

#[test]
fn test_lists_demo_sessions() {
    let dir = tempdir().unwrap();
    let uploads = dir.path().join("uploads");
    let store = ExperimentStore::open(Config::with_upload_folder(&uploads)).unwrap();
    let archive = write_demo_archive(&dir.path().join("demo.zip"));
    let session = store.create_session(&archive, None).unwrap();

    let args = SessionsArgs {
        session: session.id.to_string(),
    };
    execute(&args, &global_for(&uploads)).unwrap();
}
