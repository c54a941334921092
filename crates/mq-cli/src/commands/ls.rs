//! Ls command implementation

use anyhow::Result;
use chrono::NaiveDateTime;
use mq_core::SessionId;
use mq_store::{ExperimentInfo, ExperimentStore, StoreResult};
use serde::Serialize;

use crate::cli::{GlobalArgs, LsArgs, OutputFormat};
use crate::commands::common::{open_store, or_unknown, parse_session, print_json};

/// One upload session in a listing
#[derive(Debug, Serialize)]
struct SessionEntry {
    session_id: SessionId,
    created_at: Option<NaiveDateTime>,
    experiments: usize,
}

/// Execute the ls command
pub fn execute(args: &LsArgs, global: &GlobalArgs) -> Result<()> {
    let store = open_store(global)?;

    match &args.session {
        None => {
            let sessions = session_entries(&store)?;
            match args.output {
                OutputFormat::Json => print_json(&sessions),
                OutputFormat::Table => {
                    print_sessions(&sessions);
                    Ok(())
                }
            }
        }
        Some(session) => {
            let session = parse_session(session)?;
            let experiments = experiment_infos(&store, &session)?;
            match args.output {
                OutputFormat::Json => print_json(&experiments),
                OutputFormat::Table => {
                    print_experiments(&session, &experiments);
                    Ok(())
                }
            }
        }
    }
}

fn session_entries(store: &ExperimentStore) -> StoreResult<Vec<SessionEntry>> {
    store
        .list_sessions()?
        .into_iter()
        .map(|session_id| {
            let experiments = store.list_experiments(&session_id)?.len();
            Ok(SessionEntry {
                created_at: session_id.created_at(),
                session_id,
                experiments,
            })
        })
        .collect()
}

fn experiment_infos(
    store: &ExperimentStore,
    session: &SessionId,
) -> StoreResult<Vec<ExperimentInfo>> {
    store
        .list_experiments(session)?
        .into_iter()
        .map(|experiment| store.experiment_info(session, &experiment))
        .collect()
}

fn print_sessions(sessions: &[SessionEntry]) {
    if sessions.is_empty() {
        println!("No sessions found.");
        return;
    }

    let id_width = sessions
        .iter()
        .map(|s| s.session_id.as_str().len())
        .max()
        .unwrap_or(7)
        .max(7);
    let created_width = 19;

    println!(
        "{:<id_width$}  {:<created_width$}  EXPERIMENTS",
        "SESSION", "CREATED",
    );
    println!("{:-<id_width$}  {:-<created_width$}  {}", "", "", "-".repeat(11));

    for entry in sessions {
        let created = or_unknown(entry.created_at.map(|at| at.format("%Y-%m-%d %H:%M:%S")));
        println!(
            "{:<id_width$}  {:<created_width$}  {}",
            entry.session_id, created, entry.experiments,
        );
    }

    println!();
    println!("{} sessions", sessions.len());
}

fn print_experiments(session: &SessionId, experiments: &[ExperimentInfo]) {
    if experiments.is_empty() {
        println!("No experiments in session {session}.");
        return;
    }

    let id_width = experiments
        .iter()
        .map(|e| e.experiment_id.as_str().len())
        .max()
        .unwrap_or(10)
        .max(10);
    let lod_width = 5;
    let mapqtl_width = 14;
    let markers_width = 7;

    println!(
        "{:<id_width$}  {:<lod_width$}  {:<mapqtl_width$}  {:<markers_width$}  TRAITS",
        "EXPERIMENT", "LOD", "MAPQTL SESSION", "MARKERS",
    );
    println!(
        "{:-<id_width$}  {:-<lod_width$}  {:-<mapqtl_width$}  {:-<markers_width$}  {}",
        "",
        "",
        "",
        "",
        "-".repeat(6),
    );

    for info in experiments {
        println!(
            "{:<id_width$}  {:<lod_width$}  {:<mapqtl_width$}  {:<markers_width$}  {}",
            info.experiment_id,
            or_unknown(info.lod_threshold.map(|lod| format!("{lod:?}"))),
            or_unknown(info.mapqtl_session.as_ref()),
            or_unknown(info.marker_count),
            or_unknown(info.trait_count),
        );
    }

    println!();
    println!("{} experiments", experiments.len());
}

#[cfg(test)]
#[path = "ls_test.rs"]
mod tests;
