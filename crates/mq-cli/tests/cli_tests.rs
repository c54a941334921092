//! Integration tests driving the mq2 binary over the demo archive

use mq_pipeline::test_utils::{write_demo_archive, write_zip};
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

/// Path to the compiled mq2 binary
fn mq2_bin() -> String {
    env!("CARGO_BIN_EXE_mq2").to_string()
}

/// Run `mq2` against `upload_folder` and return (stdout, stderr, exit code).
fn run_mq2(upload_folder: &Path, args: &[&str]) -> (String, String, Option<i32>) {
    let output = Command::new(mq2_bin())
        .arg("--upload-folder")
        .arg(upload_folder)
        .args(args)
        .env_remove("MQ2_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("Failed to execute mq2 with args {:?}: {}", args, e));
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code(),
    )
}

#[test]
fn test_upload_run_and_browse() {
    let dir = tempdir().unwrap();
    let uploads = dir.path().join("uploads");
    let archive = write_demo_archive(&dir.path().join("demo.zip"));

    let (stdout, stderr, code) = run_mq2(&uploads, &["upload", archive.to_str().unwrap()]);
    assert_eq!(code, Some(0), "upload failed: {stderr}");
    let session = stdout.trim().to_string();
    assert!(uploads.join(&session).is_dir());

    let (stdout, _, code) = run_mq2(&uploads, &["sessions", &session]);
    assert_eq!(code, Some(0));
    assert_eq!(stdout.lines().collect::<Vec<_>>(), vec!["1", "2"]);

    let run_args = ["run", session.as_str(), "--lod", "3.0", "--mapqtl-session", "2"];
    let (stdout, stderr, code) = run_mq2(&uploads, &run_args);
    assert_eq!(code, Some(0), "run failed: {stderr}");
    let experiment = stdout.trim().to_string();
    assert!(uploads.join(&session).join(&experiment).is_dir());

    let (stdout, _, code) = run_mq2(&uploads, &run_args);
    assert_eq!(code, Some(0));
    assert!(stdout.starts_with(&experiment));
    assert!(stdout.contains("already run"));

    let (stdout, _, code) = run_mq2(&uploads, &["ls", &session, "--output", "json"]);
    assert_eq!(code, Some(0));
    let listed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["experiment_id"], experiment.as_str());
    assert_eq!(listed[0]["marker_count"], 50);

    let (stdout, _, code) = run_mq2(&uploads, &["show", &session, &experiment, "-o", "json"]);
    assert_eq!(code, Some(0));
    let summary: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(summary["series"]["group_boundaries"], serde_json::json!([17, 34]));

    let (stdout, _, code) = run_mq2(&uploads, &["package", &session, &experiment]);
    assert_eq!(code, Some(0));
    assert!(Path::new(stdout.trim()).is_file());
}

#[test]
fn test_exit_codes_follow_error_kind() {
    let dir = tempdir().unwrap();
    let uploads = dir.path().join("uploads");
    let archive = write_demo_archive(&dir.path().join("demo.zip"));
    let (stdout, _, _) = run_mq2(&uploads, &["upload", archive.to_str().unwrap()]);
    let session = stdout.trim().to_string();

    let (_, stderr, code) = run_mq2(
        &uploads,
        &["run", &session, "--lod", "100", "--mapqtl-session", "2"],
    );
    assert_eq!(code, Some(4));
    assert!(stderr.contains("P004"), "{stderr}");

    let (_, _, code) = run_mq2(
        &uploads,
        &["run", "20240101000000000000ABC", "--lod", "3", "--mapqtl-session", "2"],
    );
    assert_eq!(code, Some(3));

    let (_, _, code) = run_mq2(&uploads, &["sessions", "../outside"]);
    assert_eq!(code, Some(2));
}

#[test]
fn test_sessions_of_archive_without_mapqtl_output() {
    let dir = tempdir().unwrap();
    let uploads = dir.path().join("uploads");
    let archive = dir.path().join("readme.zip");
    write_zip(&archive, &[("project/README.txt".to_string(), b"no results".to_vec())]);

    let (stdout, stderr, code) = run_mq2(&uploads, &["upload", archive.to_str().unwrap()]);
    assert_eq!(code, Some(0), "upload failed: {stderr}");
    let session = stdout.trim().to_string();

    let (stdout, stderr, code) = run_mq2(&uploads, &["sessions", &session]);
    assert_eq!(code, Some(0), "{stderr}");
    assert!(stdout.contains("No MapQTL sessions found"), "{stdout}");
}
