use super::*;
use mq_core::{Config, ExperimentParams};
use mq_pipeline::test_utils::write_demo_archive;
use tempfile::tempdir;

#[test]
fn test_listings_count_experiments() {
    let dir = tempdir().unwrap();
    let store =
        ExperimentStore::open(Config::with_upload_folder(dir.path().join("uploads"))).unwrap();
    let archive = write_demo_archive(&dir.path().join("demo.zip"));
    let session = store.create_session(&archive, None).unwrap().id;
    let empty = store.create_session(&archive, None).unwrap().id;
    let params = ExperimentParams::from_strings("3.0", "2").unwrap();
    let experiment = store.run(&session, &params).unwrap().experiment_id().clone();

    let entries = session_entries(&store).unwrap();
    assert_eq!(entries.len(), 2);
    let counts: Vec<_> = entries
        .iter()
        .map(|e| (e.session_id.clone(), e.experiments))
        .collect();
    assert!(counts.contains(&(session.clone(), 1)));
    assert!(counts.contains(&(empty, 0)));
    assert!(entries.iter().all(|e| e.created_at.is_some()));

    let infos = experiment_infos(&store, &session).unwrap();
    assert_eq!(infos.len(), 1);
    assert_eq!(infos[0].experiment_id, experiment);
    assert_eq!(infos[0].lod_threshold, Some(3.0));
    assert_eq!(infos[0].marker_count, Some(50));
}

#[test]
fn test_ls_json_of_empty_folder() {
    let dir = tempdir().unwrap();
    let args = LsArgs {
        session: None,
        output: OutputFormat::Json,
    };
    let global = GlobalArgs {
        verbose: false,
        config: None,
        upload_folder: Some(dir.path().join("uploads").display().to_string()),
    };

    execute(&args, &global).unwrap();
}
