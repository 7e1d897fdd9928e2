pub mod cli;
pub mod dispatch;

use anyhow::Result;
use clap::Parser;
use migwiz_core::diagnostics::DiagnosticsSession;

use crate::cli::{Cli, Command};

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let session = DiagnosticsSession::initialize(cli.diagnostics)?;
    if let Some(path) = session.path() {
        eprintln!("Diagnostics enabled: {}", path.display());
    }

    // Only the command name goes into the log; run arguments carry credentials.
    let command_name = match &cli.command {
        None => "wizard",
        Some(Command::Run(_)) => "run",
        Some(Command::Doctor) => "doctor",
    };
    session.record(format!("dispatch command={command_name}"));

    dispatch::run_with_deps(cli)
}
