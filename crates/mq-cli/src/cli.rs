//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// MQ2 - Extract QTL hotspots from MapQTL output
#[derive(Parser, Debug)]
#[command(name = "mq2")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the mq2.yml config file
    #[arg(short, long, global = true, env = "MQ2_CONFIG")]
    pub config: Option<String>,

    /// Override the upload folder
    #[arg(short, long, global = true)]
    pub upload_folder: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store a MapQTL archive as a new session
    Upload(UploadArgs),

    /// List the MapQTL analysis sessions found in a session's archive
    Sessions(SessionsArgs),

    /// Extract the QTL hotspots of a session for a threshold and analysis session
    Run(RunArgs),

    /// List sessions, or the experiments of one session
    Ls(LsArgs),

    /// Show the summary and QTL series of an experiment
    Show(ShowArgs),

    /// Show the QTLs resolved to one marker
    Marker(MarkerArgs),

    /// Bundle the files of an experiment into a zip archive
    Package(PackageArgs),

    /// Remove sessions older than the retention window
    Clean(CleanArgs),
}

/// Arguments for the upload command
#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Zip archive holding the MapQTL output files
    pub archive: String,

    /// JoinMap map file to use as the genetic map
    #[arg(short, long)]
    pub map: Option<String>,
}

/// Arguments for the sessions command
#[derive(Args, Debug)]
pub struct SessionsArgs {
    /// Upload session id
    pub session: String,
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Upload session id
    pub session: String,

    /// LOD threshold a marker must reach to count as a QTL
    #[arg(long)]
    pub lod: String,

    /// MapQTL analysis session to read the QTLs from
    #[arg(long)]
    pub mapqtl_session: String,
}

/// Arguments for the ls command
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Upload session id; lists all sessions when omitted
    pub session: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Arguments for the show command
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Upload session id
    pub session: String,

    /// Experiment id
    pub experiment: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Arguments for the marker command
#[derive(Args, Debug)]
pub struct MarkerArgs {
    /// Upload session id
    pub session: String,

    /// Experiment id
    pub experiment: String,

    /// Marker name
    pub marker: String,
}

/// Arguments for the package command
#[derive(Args, Debug)]
pub struct PackageArgs {
    /// Upload session id
    pub session: String,

    /// Experiment id
    pub experiment: String,
}

/// Arguments for the clean command
#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Show what would be removed without removing anything
    #[arg(long)]
    pub dry_run: bool,
}

/// Output formats for listings
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned columns
    Table,
    /// JSON document
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
