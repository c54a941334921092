use super::*;
use mq_pipeline::test_utils::write_demo_archive;
use mq_store::ErrorKind;
use std::fs;
use tempfile::tempdir;

fn global_for(upload_folder: &Path) -> GlobalArgs {
    GlobalArgs {
        verbose: false,
        config: None,
        upload_folder: Some(upload_folder.display().to_string()),
    }
}

#[test]
fn test_upload_stores_archive_as_session() {
    let dir = tempdir().unwrap();
    let uploads = dir.path().join("uploads");
    let archive = write_demo_archive(&dir.path().join("demo.zip"));

    let args = UploadArgs {
        archive: archive.display().to_string(),
        map: None,
    };
    execute(&args, &global_for(&uploads)).unwrap();

    let sessions: Vec<_> = fs::read_dir(&uploads).unwrap().collect();
    assert_eq!(sessions.len(), 1);
    let session_dir = sessions[0].as_ref().unwrap().path();
    assert!(session_dir.join("input.zip").is_file());
}

#[test]
fn test_upload_rejects_disallowed_extension() {
    let dir = tempdir().unwrap();
    let uploads = dir.path().join("uploads");
    let archive = dir.path().join("results.txt");
    fs::write(&archive, "not an archive").unwrap();

    let args = UploadArgs {
        archive: archive.display().to_string(),
        map: None,
    };
    let err = execute(&args, &global_for(&uploads)).unwrap_err();

    assert_eq!(
        err.downcast_ref::<StoreError>().unwrap().kind(),
        ErrorKind::InvalidInput
    );
    assert_eq!(fs::read_dir(&uploads).unwrap().count(), 0);
}
