//! Package command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, PackageArgs};
use crate::commands::common::{open_store, parse_experiment, parse_session};

/// Execute the package command
pub fn execute(args: &PackageArgs, global: &GlobalArgs) -> Result<()> {
    let store = open_store(global)?;
    let session = parse_session(&args.session)?;
    let experiment = parse_experiment(&args.experiment)?;

    let archive = store
        .package(&session, &experiment)
        .with_context(|| format!("Failed to package experiment {experiment}"))?;
    println!("{}", archive.display());
    Ok(())
}
