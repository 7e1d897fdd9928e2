use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "migwiz")]
#[command(bin_name = "migwiz")]
#[command(version)]
#[command(about = "Step-by-step archive migration wizard")]
pub struct Cli {
    /// Capture a diagnostics log for this invocation.
    #[arg(long, global = true)]
    pub diagnostics: bool,

    /// Without a subcommand, the interactive wizard starts.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(about = "Run the whole migration non-interactively")]
    Run(RunArgs),
    #[command(about = "Run environment and configuration checks")]
    Doctor,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Archive file to migrate.
    #[arg(long)]
    pub archive: PathBuf,

    /// Username for the migration service.
    #[arg(long)]
    pub username: String,

    /// Password for the migration service.
    #[arg(long)]
    pub password: String,

    /// Read every entry back after migrating it.
    #[arg(long)]
    pub verify: bool,

    /// Keep going past entries that fail to migrate.
    #[arg(long)]
    pub keep_going: bool,
}
