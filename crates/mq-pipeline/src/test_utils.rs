//! Shared test utilities for mq-pipeline
//!
//! Fixture builders for MapQTL output files and upload archives. The demo
//! archive holds two analysis sessions of three traits over 50 markers in
//! three linkage groups.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use mq_core::MapRow;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Header line of generated MapQTL output files
pub const MQO_HEADER: &str = "No.\tLocus\tGroup\tPosition\tLOD\tmu_A\tmu_B";

/// Traits of the demo archive
pub const DEMO_TRAITS: &[&str] = &["height", "weight", "yield"];

/// Analysis sessions of the demo archive
pub const DEMO_SESSIONS: &[&str] = &["1", "2"];

/// Markers per linkage group of the demo archive
const DEMO_GROUP_SIZES: &[(&str, usize)] = &[("1", 17), ("2", 17), ("3", 16)];

/// Render MapQTL output text from `(locus, group, position, lod)` rows.
pub fn mqo_content(rows: &[(&str, &str, f64, f64)]) -> String {
    let mut out = String::from(MQO_HEADER);
    out.push('\n');
    for (index, (locus, group, position, lod)) in rows.iter().enumerate() {
        out.push_str(&format!(
            "{}\t{locus}\t{group}\t{position:.3}\t{lod:.3}\t10.0\t11.0\n",
            index + 1
        ));
    }
    out
}

/// Write a MapQTL output file named `file_name` under `dir`.
pub fn write_mqo(dir: &Path, file_name: &str, rows: &[(&str, &str, f64, f64)]) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(file_name);
    fs::write(&path, mqo_content(rows)).unwrap();
    path
}

/// The 50 demo markers, `M01` to `M50`, 5 cM apart within each group.
pub fn demo_markers() -> Vec<MapRow> {
    let mut markers = Vec::new();
    for (group, size) in DEMO_GROUP_SIZES {
        for k in 0..*size {
            markers.push(MapRow {
                marker: format!("M{:02}", markers.len() + 1),
                group: group.to_string(),
                position: k as f64 * 5.0,
            });
        }
    }
    markers
}

/// LOD of demo marker `marker_index` for trait `trait_index` in `session_index`.
///
/// Every trait peaks at 6.0 on every tenth marker (shifted per trait and
/// session), with 3.5 shoulders on both sides and 0.8 elsewhere.
pub fn demo_lod(session_index: usize, trait_index: usize, marker_index: usize) -> f64 {
    let phase = (marker_index + 4 * trait_index + 3 * session_index) % 10;
    match phase {
        0 => 6.0,
        1 | 9 => 3.5,
        _ => 0.8,
    }
}

/// MapQTL output rows of one demo trait, with an interval position between
/// consecutive markers of a group.
pub fn demo_rows(session_index: usize, trait_index: usize) -> Vec<(String, String, f64, f64)> {
    let markers = demo_markers();
    let mut rows = Vec::new();
    for (i, marker) in markers.iter().enumerate() {
        let lod = demo_lod(session_index, trait_index, i);
        rows.push((marker.marker.clone(), marker.group.clone(), marker.position, lod));

        if let Some(next) = markers.get(i + 1).filter(|next| next.group == marker.group) {
            let between = lod.min(demo_lod(session_index, trait_index, i + 1));
            rows.push((
                "-".to_string(),
                marker.group.clone(),
                (marker.position + next.position) / 2.0,
                between,
            ));
        }
    }
    rows
}

/// MapQTL output text of one demo trait.
pub fn demo_mqo(session_index: usize, trait_index: usize) -> String {
    let rows = demo_rows(session_index, trait_index);
    let borrowed: Vec<(&str, &str, f64, f64)> = rows
        .iter()
        .map(|(locus, group, position, lod)| (locus.as_str(), group.as_str(), *position, *lod))
        .collect();
    mqo_content(&borrowed)
}

/// File name MapQTL uses for a trait of an analysis session.
pub fn mqo_file_name(session: &str, trait_name: &str) -> String {
    format!("Session {session} (IM)_{trait_name}.mqo")
}

/// Write a zip archive at `path` holding `entries` as `(name, contents)`.
pub fn write_zip(path: &Path, entries: &[(String, Vec<u8>)]) {
    let file = File::create(path).unwrap();
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, contents) in entries {
        writer.start_file(name.as_str(), options).unwrap();
        writer.write_all(contents).unwrap();
    }
    writer.finish().unwrap();
}

/// Entries of the demo archive: every trait of every demo session.
pub fn demo_entries() -> Vec<(String, Vec<u8>)> {
    let mut entries = vec![("project/README.txt".to_string(), b"demo".to_vec())];
    for (s, session) in DEMO_SESSIONS.iter().enumerate() {
        for (t, trait_name) in DEMO_TRAITS.iter().enumerate() {
            entries.push((
                format!("project/mapqtl/{}", mqo_file_name(session, trait_name)),
                demo_mqo(s, t).into_bytes(),
            ));
        }
    }
    entries
}

/// Write the demo archive at `path`.
pub fn write_demo_archive(path: &Path) -> PathBuf {
    write_zip(path, &demo_entries());
    path.to_path_buf()
}

/// JoinMap map text for the demo markers.
pub fn demo_joinmap() -> String {
    let mut out = String::from("; demo linkage map\n");
    let markers = demo_markers();
    let mut current: Option<&str> = None;
    for marker in &markers {
        if current != Some(marker.group.as_str()) {
            out.push_str(&format!("group {}\n", marker.group));
            current = Some(marker.group.as_str());
        }
        out.push_str(&format!("{} {:.1}\n", marker.marker, marker.position));
    }
    out
}
