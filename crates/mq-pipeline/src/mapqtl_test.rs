use super::*;
use crate::test_utils::write_mqo;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_trait_name_from_file_name() {
    assert_eq!(trait_name(Path::new("Session 2 (IM)_height.mqo")), "height");
    assert_eq!(
        trait_name(Path::new("x/Session 1 (MQM)_seed_weight.mqo")),
        "seed_weight"
    );
    assert_eq!(trait_name(Path::new("plain.mqo")), "plain");
}

#[test]
fn test_read_mqo_locates_columns_by_name() {
    let dir = tempdir().unwrap();
    let path = write_mqo(
        dir.path(),
        "Session 1 (IM)_height.mqo",
        &[
            ("M1", "1", 0.0, 1.25),
            ("-", "1", 2.5, 1.5),
            ("M2", "1", 5.0, 4.0),
        ],
    );

    let file = read_mqo(&path).unwrap();
    assert_eq!(file.trait_name, "height");
    assert_eq!(file.rows.len(), 3);
    assert_eq!(file.rows[2].locus, "M2");
    assert_eq!(file.rows[2].position, 5.0);
    assert_eq!(file.rows[2].lod, 4.0);

    let markers: Vec<_> = file.marker_rows().map(|r| r.locus.as_str()).collect();
    assert_eq!(markers, vec!["M1", "M2"]);
}

#[test]
fn test_read_mqo_reordered_columns_and_blank_locus() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Session 1 (IM)_t.mqo");
    fs::write(
        &path,
        "LOD\tPosition\tGroup\tLocus\n3.5\t0.0\tA\tM1\n2.0\t1.0\tA\t\n",
    )
    .unwrap();

    let file = read_mqo(&path).unwrap();
    assert_eq!(file.rows[0].locus, "M1");
    assert_eq!(file.rows[0].lod, 3.5);
    assert!(!file.rows[1].is_marker());
}

#[test]
fn test_read_mqo_missing_column() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Session 1 (IM)_t.mqo");
    fs::write(&path, "Locus\tGroup\tPosition\nM1\t1\t0.0\n").unwrap();

    let err = read_mqo(&path).unwrap_err();
    assert!(matches!(err, PipelineError::Format { line: 1, .. }));
    assert!(err.to_string().contains("LOD"));
}

#[test]
fn test_read_mqo_bad_number_reports_line() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Session 1 (IM)_t.mqo");
    fs::write(
        &path,
        "Locus\tGroup\tPosition\tLOD\nM1\t1\t0.0\t1.0\nM2\t1\t5.0\tn/a\n",
    )
    .unwrap();

    let err = read_mqo(&path).unwrap_err();
    assert!(matches!(err, PipelineError::Format { line: 3, .. }));
}

#[test]
fn test_read_mqo_missing_file() {
    let dir = tempdir().unwrap();
    let err = read_mqo(&dir.path().join("absent.mqo")).unwrap_err();
    assert!(matches!(err, PipelineError::Io { .. }));
}
