use std::env;
use std::fmt;

use crate::config::{MigwizConfig, load_config, resolve_config_path};
use crate::credentials::{validate_password, validate_username};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Pass,
    Fail,
}

impl fmt::Display for CheckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorCheck {
    pub name: String,
    pub state: CheckState,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorReport {
    pub checks: Vec<DoctorCheck>,
}

impl DoctorReport {
    pub fn has_failures(&self) -> bool {
        self.checks
            .iter()
            .any(|check| check.state == CheckState::Fail)
    }

    pub fn summary(&self) -> String {
        let passed = self
            .checks
            .iter()
            .filter(|check| check.state == CheckState::Pass)
            .count();
        let failed = self.checks.len().saturating_sub(passed);
        format!("{passed} passed, {failed} failed")
    }
}

pub fn run_doctor() -> DoctorReport {
    let mut checks = Vec::new();

    checks.push(match env::consts::OS {
        "macos" => pass_check("os is supported", "detected macOS"),
        "linux" => pass_check("os is supported", "detected Linux"),
        detected => fail_check(
            "os is supported",
            format!("detected {detected}, expected macOS or Linux"),
        ),
    });

    match resolve_config_path() {
        Ok(config_path) => {
            if config_path.exists() {
                checks.push(pass_check(
                    "config file exists",
                    format!("found at {}", config_path.display()),
                ));

                match load_config(&config_path) {
                    Ok(config) => {
                        checks.push(pass_check("config parses and validates", "config is valid"));
                        checks.push(check_account_formats(&config));
                        checks.push(check_staging_dir(&config));
                    }
                    Err(error) => {
                        checks.push(fail_check("config parses and validates", error.to_string()));
                        push_skipped_checks(
                            &mut checks,
                            &["account credentials well-formed", "staging directory usable"],
                            "config is invalid",
                        );
                    }
                }
            } else {
                checks.push(pass_check(
                    "config file exists",
                    format!(
                        "not found at {}; defaults will be used",
                        config_path.display()
                    ),
                ));
                let defaults = MigwizConfig::default();
                checks.push(check_account_formats(&defaults));
                checks.push(check_staging_dir(&defaults));
            }
        }
        Err(error) => {
            checks.push(fail_check("config path resolves", error.to_string()));
            push_skipped_checks(
                &mut checks,
                &[
                    "config file exists",
                    "account credentials well-formed",
                    "staging directory usable",
                ],
                "config path could not be resolved",
            );
        }
    }

    DoctorReport { checks }
}

fn check_account_formats(config: &MigwizConfig) -> DoctorCheck {
    if config.service.accounts.is_empty() {
        return pass_check(
            "account credentials well-formed",
            "no accounts configured; any credentials are accepted",
        );
    }

    let mut problems = Vec::new();
    for account in &config.service.accounts {
        if let Err(error) = validate_username(&account.username) {
            problems.push(format!("account '{}': {error}", account.username));
        }
        if let Err(error) = validate_password(&account.password) {
            problems.push(format!("account '{}': {error}", account.username));
        }
    }

    if problems.is_empty() {
        pass_check(
            "account credentials well-formed",
            format!("{} account(s) validated", config.service.accounts.len()),
        )
    } else {
        fail_check("account credentials well-formed", problems.join(", "))
    }
}

fn check_staging_dir(config: &MigwizConfig) -> DoctorCheck {
    match &config.archive.staging_dir {
        None => pass_check(
            "staging directory usable",
            "not set; extraction stages next to the archive",
        ),
        Some(dir) if dir.is_dir() => pass_check(
            "staging directory usable",
            format!("found at {}", dir.display()),
        ),
        Some(dir) => fail_check(
            "staging directory usable",
            format!("expected a directory at {}", dir.display()),
        ),
    }
}

fn pass_check(name: &str, details: impl Into<String>) -> DoctorCheck {
    DoctorCheck {
        name: name.to_string(),
        state: CheckState::Pass,
        details: details.into(),
    }
}

fn fail_check(name: &str, details: impl Into<String>) -> DoctorCheck {
    DoctorCheck {
        name: name.to_string(),
        state: CheckState::Fail,
        details: details.into(),
    }
}

fn push_skipped_checks(checks: &mut Vec<DoctorCheck>, names: &[&str], reason: &str) {
    checks.extend(names.iter().copied().map(|name| {
        fail_check(name, format!("skipped because {reason}"))
    }));
}
