//! Run command implementation

use anyhow::{Context, Result};
use mq_core::ExperimentParams;
use mq_store::{RunOutcome, StoreError};

use crate::cli::{GlobalArgs, RunArgs};
use crate::commands::common::{open_store, parse_session};

/// Execute the run command
pub fn execute(args: &RunArgs, global: &GlobalArgs) -> Result<()> {
    let store = open_store(global)?;
    let session = parse_session(&args.session)?;
    let params = ExperimentParams::from_strings(&args.lod, &args.mapqtl_session)
        .map_err(StoreError::from)?;

    let outcome = store
        .run(&session, &params)
        .with_context(|| format!("Run of session {session} with {params} failed"))?;

    match outcome {
        RunOutcome::Created(experiment) => println!("{experiment}"),
        RunOutcome::Existing(experiment) => {
            println!("{experiment} (already run with {params})");
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "run_test.rs"]
mod tests;
