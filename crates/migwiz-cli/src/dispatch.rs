use anyhow::{Result, bail};
use comfy_table::{Cell, ContentArrangement, Table};
use migwiz_app::App;
use migwiz_app::migrate::{MigrationOptions, MigrationReport};
use migwiz_app::navigate::WizardOps;
use migwiz_core::backend::{ArchiveFileExtractor, SimulatedAuthenticator};
use migwiz_core::doctor::{CheckState, DoctorReport, run_doctor};
use migwiz_core::session::{Credentials, SessionState};
use migwiz_core::steps::StepId;

use crate::cli::{Cli, Command, RunArgs};

pub fn run_with_deps(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Command::Doctor) => run_doctor_command(),
        Some(Command::Run(args)) => run_headless_command(&args),
        None => run_wizard_command(),
    }
}

fn run_wizard_command() -> Result<()> {
    let config = migwiz_app::load_config()?;
    let _ = migwiz_tui::run_wizard(config)?;
    Ok(())
}

fn run_doctor_command() -> Result<()> {
    let report = run_doctor();
    print_doctor_report(&report);

    if report.has_failures() {
        bail!("doctor found failing checks");
    }
    Ok(())
}

/// Mirrors what the notices and loading banner show in the interactive
/// wizard, on stderr, so stdout stays reserved for the report.
#[derive(Default)]
struct ConsoleOps;

impl WizardOps for ConsoleOps {
    fn notify(&mut self, message: &str) {
        eprintln!("{message}");
    }

    fn loading_started(&mut self, message: &str, _step: Option<StepId>) {
        eprintln!("{message}");
    }

    fn loading_finished(&mut self) {}
}

fn run_headless_command(args: &RunArgs) -> Result<()> {
    let config = migwiz_app::load_config()?;
    let authenticator = SimulatedAuthenticator::from_config(&config.service);
    let extractor = ArchiveFileExtractor::from_config(&config.archive);
    let app = App::new(&authenticator, &extractor);

    let mut session = SessionState::new();
    session.stage_archive(args.archive.clone());
    session.set_credentials(Credentials {
        username: args.username.clone(),
        password: args.password.clone(),
    });

    let mut ops = ConsoleOps;
    let reached = app.advance_to_completion(StepId::Upload, &mut session, &mut ops);
    if reached != StepId::Complete {
        bail!("migration stopped at the {reached} step; fix the reported problem and retry");
    }

    let options = MigrationOptions {
        verify: args.verify,
        keep_going: args.keep_going,
    };
    let report = app.run_migration(&session, &options, &mut |_| {})?;
    print_migration_report(&report);
    Ok(())
}

fn print_doctor_report(report: &DoctorReport) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Check", "Status", "Details"]);

    for check in &report.checks {
        let status = match check.state {
            CheckState::Pass => "PASS",
            CheckState::Fail => "FAIL",
        };

        table.add_row(vec![
            Cell::new(check.name.as_str()),
            Cell::new(status),
            Cell::new(check.details.as_str()),
        ]);
    }

    println!("{table}");
    println!("{}", report.summary());
}

fn print_migration_report(report: &MigrationReport) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec![
        Cell::new("Started"),
        Cell::new(report.started_at.as_str()),
    ]);
    table.add_row(vec![
        Cell::new("Finished"),
        Cell::new(report.finished_at.as_str()),
    ]);
    table.add_row(vec![
        Cell::new("Entries migrated"),
        Cell::new(report.entries_migrated),
    ]);
    table.add_row(vec![
        Cell::new("Bytes migrated"),
        Cell::new(report.bytes_migrated),
    ]);
    table.add_row(vec![
        Cell::new("Warnings"),
        Cell::new(report.warnings.len()),
    ]);

    println!("{table}");
    for warning in &report.warnings {
        println!("warning: {warning}");
    }
    println!("Migration complete.");
}
