//! Clean command implementation

use anyhow::{Context, Result};
use chrono::Local;

use crate::cli::{CleanArgs, GlobalArgs};
use crate::commands::common::open_store;

/// Execute the clean command
pub fn execute(args: &CleanArgs, global: &GlobalArgs) -> Result<()> {
    let store = open_store(global)?;
    let retention_days = store.config().retention_days;
    let today = Local::now().date_naive();

    if args.dry_run {
        println!("Dry run - would remove sessions older than {retention_days} days:");
    } else {
        println!(
            "Removing sessions older than {retention_days} days from {}",
            store.config().upload_folder.display()
        );
    }

    let report = store
        .sweep_sessions(today, args.dry_run)
        .context("Retention sweep failed")?;

    for session in &report.removed {
        if args.dry_run {
            println!("  Would remove: {session}");
        } else {
            println!("  Removed: {session}");
        }
    }
    if global.verbose {
        for session in &report.kept_recent {
            println!("  Keeping (recent experiment): {session}");
        }
    }

    if report.removed.is_empty() {
        println!("Nothing to clean.");
    } else if args.dry_run {
        println!("\nWould remove {} sessions", report.removed.len());
    } else {
        println!("\nRemoved {} sessions", report.removed.len());
    }
    Ok(())
}

#[cfg(test)]
#[path = "clean_test.rs"]
mod tests;
