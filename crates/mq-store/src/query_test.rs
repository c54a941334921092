use super::*;
use crate::repository::FsRepository;
use mq_core::{Config, MapRow};
use mq_pipeline::MapQtlToolkit;
use std::fs;
use tempfile::tempdir;

fn row(marker: &str, group: &str, qtls: &str) -> MapWithQtlRow {
    MapWithQtlRow {
        marker: marker.to_string(),
        group: group.to_string(),
        position: 0.0,
        qtls: qtls.to_string(),
    }
}

fn with_marker(trait_name: &str, marker: &str) -> QtlWithMarkerRow {
    QtlWithMarkerRow {
        trait_name: trait_name.to_string(),
        locus: marker.to_string(),
        group: "1".to_string(),
        position: 12.5,
        lod: 4.25,
        marker: marker.to_string(),
    }
}

#[test]
fn test_series_group_boundaries() {
    let rows = vec![
        row("m1", "A", "1"),
        row("m2", "A", "#"),
        row("m3", "A", "2"),
        row("m4", "B", "#"),
        row("m5", "B", "3"),
        row("m6", "C", "#"),
    ];

    let series = QtlSeries::from_rows(&rows);
    assert_eq!(series.group_boundaries, vec![3, 5]);
    assert_eq!(series.linkage_groups, vec!["A", "B", "C"]);
    assert_eq!(series.markers.len(), 6);
    assert_eq!(series.values, vec![1.0, 2.0, 3.0]);
    assert_eq!(series.ceiling(), 5.0);
}

#[test]
fn test_series_single_group_has_no_boundaries() {
    let series = QtlSeries::from_rows(&[row("m1", "A", "#"), row("m2", "A", "#")]);
    assert!(series.group_boundaries.is_empty());
    assert!(series.values.is_empty());
    assert_eq!(series.ceiling(), 0.0);
    assert!(!series.is_empty());
}

#[test]
fn test_marker_detail_strips_group_and_marker() {
    let rows = vec![
        with_marker("height", "M1"),
        with_marker("weight", "M2"),
        with_marker("yield", "M1"),
    ];

    let detail = MarkerDetail::from_rows(&rows, "M1");
    assert_eq!(detail.headers, vec!["Trait", "Locus", "Position", "LOD"]);
    assert_eq!(
        detail.rows,
        vec![
            vec!["height", "M1", "12.5", "4.25"],
            vec!["yield", "M1", "12.5", "4.25"],
        ]
    );
    assert!(MarkerDetail::from_rows(&rows, "m1").rows.is_empty());
}

#[test]
fn test_views_of_experiment_without_tables_are_empty() {
    let dir = tempdir().unwrap();
    let store = ExperimentStore::open(Config::with_upload_folder(dir.path().join("uploads"))).unwrap();
    let archive = dir.path().join("input.zip");
    fs::write(&archive, b"zip").unwrap();
    let session = store.create_session(&archive, None).unwrap().id;

    let experiment = ExperimentId::parse("20240101120000_s2_lod3.0").unwrap();
    store.repository().create(&session, &experiment).unwrap();
    store.repository().commit(&session, &experiment).unwrap();

    assert_eq!(store.qtl_series(&session, &experiment).unwrap(), QtlSeries::default());
    assert_eq!(
        store.marker_detail(&session, &experiment, "M1").unwrap(),
        MarkerDetail::default()
    );

    let summary = store.experiment_summary(&session, &experiment).unwrap();
    assert_eq!(summary.ceiling, 0.0);
    assert_eq!(summary.info.marker_count, None);
    assert!(summary.run_at.is_some());
}

#[test]
fn test_series_reads_written_table() {
    let dir = tempdir().unwrap();
    let repo = FsRepository::new(dir.path().join("uploads"));
    let store = ExperimentStore::with_parts(
        Config::with_upload_folder(dir.path().join("uploads")),
        repo,
        MapQtlToolkit,
    );
    let archive = dir.path().join("input.zip");
    fs::write(&archive, b"zip").unwrap();
    let session = store.create_session(&archive, None).unwrap().id;
    let experiment = ExperimentId::parse("20240101120000_s2_lod3.0").unwrap();
    let staging = store.repository().create(&session, &experiment).unwrap();

    let map = vec![
        MapRow {
            marker: "M1".to_string(),
            group: "1".to_string(),
            position: 0.0,
        },
        MapRow {
            marker: "M2".to_string(),
            group: "2".to_string(),
            position: 0.0,
        },
    ];
    let rows: Vec<_> = map
        .iter()
        .enumerate()
        .map(|(i, m)| MapWithQtlRow::new(m, i))
        .collect();
    mq_core::write_table(&staging.join(MapWithQtlRow::FILE_NAME), &rows).unwrap();
    store.repository().commit(&session, &experiment).unwrap();

    let series = store.qtl_series(&session, &experiment).unwrap();
    assert_eq!(series.markers, vec!["M1", "M2"]);
    assert_eq!(series.values, vec![1.0]);
    assert_eq!(series.group_boundaries, vec![1]);
}
