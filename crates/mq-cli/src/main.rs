//! MQ2 CLI - extract QTL hotspots from MapQTL output

use anyhow::Result;
use clap::Parser;
use mq_store::{ErrorKind, StoreError};

mod cli;
mod commands;

use cli::Cli;
use commands::{clean, ls, marker, package, run, sessions, show, upload};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    match dispatch(&cli) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => std::process::ExitCode::from(exit_code(&err)),
    }
}

fn dispatch(cli: &Cli) -> Result<()> {
    match &cli.command {
        cli::Commands::Upload(args) => upload::execute(args, &cli.global),
        cli::Commands::Sessions(args) => sessions::execute(args, &cli.global),
        cli::Commands::Run(args) => run::execute(args, &cli.global),
        cli::Commands::Ls(args) => ls::execute(args, &cli.global),
        cli::Commands::Show(args) => show::execute(args, &cli.global),
        cli::Commands::Marker(args) => marker::execute(args, &cli.global),
        cli::Commands::Package(args) => package::execute(args, &cli.global),
        cli::Commands::Clean(args) => clean::execute(args, &cli.global),
    }
}

/// Install the log backend. `RUST_LOG` takes precedence over `--verbose`.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

/// Map a failed command to the process exit status, reporting it on stderr.
fn exit_code(err: &anyhow::Error) -> u8 {
    eprintln!("Error: {err:#}");
    match err.downcast_ref::<StoreError>().map(StoreError::kind) {
        Some(ErrorKind::InvalidInput) => 2,
        Some(ErrorKind::NotFound) => 3,
        Some(ErrorKind::NoResults) => 4,
        Some(ErrorKind::Integrity) => 5,
        Some(ErrorKind::Resource) | None => 1,
    }
}
