//! Sessions command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, SessionsArgs};
use crate::commands::common::{open_store, parse_session};

/// Execute the sessions command
pub fn execute(args: &SessionsArgs, global: &GlobalArgs) -> Result<()> {
    let store = open_store(global)?;
    let session = parse_session(&args.session)?;

    let analysis_sessions = store
        .analysis_sessions(&session)
        .with_context(|| format!("Failed to read the archive of session {session}"))?;

    if analysis_sessions.is_empty() {
        println!("No MapQTL sessions found in session {session}");
        return Ok(());
    }
    for label in &analysis_sessions {
        println!("{label}");
    }
    Ok(())
}

#[cfg(test)]
#[path = "sessions_test.rs"]
mod tests;
