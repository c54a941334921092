use super::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn make_session(root: &Path, name: &str) -> std::path::PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("input.zip"), b"zip").unwrap();
    dir
}

fn global_for(root: &Path) -> GlobalArgs {
    GlobalArgs {
        verbose: true,
        config: None,
        upload_folder: Some(root.display().to_string()),
    }
}

#[test]
fn test_clean_removes_expired_sessions() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path().join("uploads");
    let expired = make_session(&root, "20000101000000000000AAAAAAAAAAAAAAA");
    let fresh_name = format!(
        "{}000000BBBBBBBBBBBBBBB",
        Local::now().format("%Y%m%d%H%M%S")
    );
    let fresh = make_session(&root, &fresh_name);

    execute(&CleanArgs { dry_run: false }, &global_for(&root)).unwrap();

    assert!(!expired.exists());
    assert!(fresh.exists());
}

#[test]
fn test_clean_dry_run_does_not_remove() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path().join("uploads");
    let expired = make_session(&root, "20000101000000000000AAAAAAAAAAAAAAA");

    execute(&CleanArgs { dry_run: true }, &global_for(&root)).unwrap();

    assert!(expired.exists());
}
