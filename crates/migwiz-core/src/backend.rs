use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use thiserror::Error;

use crate::config::{AccountSpec, ArchiveConfig, ServiceConfig};
use crate::diagnostics;
use crate::session::Credentials;

pub const ALLOWED_ARCHIVE_SUFFIXES: [&str; 4] = [".zip", ".tar", ".tar.gz", ".tgz"];

/// Failure of a backend call itself, as opposed to a call that completed
/// with a negative answer. The message, when present, is shown verbatim.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{}", self.message.as_deref().unwrap_or("backend call failed"))]
pub struct BackendError {
    message: Option<String>,
}

impl BackendError {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    pub fn unspecified() -> Self {
        Self { message: None }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResult {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub completed: bool,
    pub destination: Option<PathBuf>,
}

pub trait Authenticator {
    fn authenticate(&self, credentials: &Credentials) -> Result<AuthResult, BackendError>;
}

pub trait ArchiveExtractor {
    fn extract(&self, archive: &Path) -> Result<Extraction, BackendError>;
}

/// Signs users in against the accounts table from the config file. With no
/// accounts configured, any non-empty credential pair is accepted, which
/// keeps first-run demos working without editing the config.
pub struct SimulatedAuthenticator {
    accounts: Vec<AccountSpec>,
    latency: Option<Duration>,
    available: bool,
}

impl SimulatedAuthenticator {
    pub fn from_config(service: &ServiceConfig) -> Self {
        Self {
            accounts: service.accounts.clone(),
            latency: service.latency_ms.map(Duration::from_millis),
            available: service.available.unwrap_or(true),
        }
    }
}

impl Authenticator for SimulatedAuthenticator {
    fn authenticate(&self, credentials: &Credentials) -> Result<AuthResult, BackendError> {
        if let Some(latency) = self.latency {
            thread::sleep(latency);
        }

        if !self.available {
            diagnostics::record("backend: authentication unavailable");
            return Err(BackendError::new(
                "Network error - migration service is unreachable",
            ));
        }

        if credentials.username.is_empty() || credentials.password.is_empty() {
            return Ok(AuthResult {
                success: false,
                message: "Username and password are required".to_string(),
            });
        }

        let accepted = self.accounts.is_empty()
            || self.accounts.iter().any(|account| {
                account.username == credentials.username
                    && account.password == credentials.password
            });

        diagnostics::record(format!(
            "backend: authentication user={} accepted={accepted}",
            credentials.username
        ));

        if accepted {
            Ok(AuthResult {
                success: true,
                message: "Authenticated".to_string(),
            })
        } else {
            Ok(AuthResult {
                success: false,
                message: "Invalid username or password".to_string(),
            })
        }
    }
}

/// Validates a staged archive file and prepares its extraction directory.
/// Error messages deliberately carry the upload-classification wording
/// ("File too large", "Upload failed", ...) that sends users back to the
/// upload step.
pub struct ArchiveFileExtractor {
    max_size_mb: u64,
    staging_dir: Option<PathBuf>,
}

impl ArchiveFileExtractor {
    pub fn new(max_size_mb: u64, staging_dir: Option<PathBuf>) -> Self {
        Self {
            max_size_mb,
            staging_dir,
        }
    }

    pub fn from_config(archive: &ArchiveConfig) -> Self {
        Self::new(archive.max_size_mb, archive.staging_dir.clone())
    }

    fn destination_for(&self, archive: &Path, stem: &str) -> PathBuf {
        match &self.staging_dir {
            Some(dir) => dir.join(stem),
            None => match archive.parent() {
                Some(parent) => parent.join(stem),
                None => PathBuf::from(stem),
            },
        }
    }
}

impl ArchiveExtractor for ArchiveFileExtractor {
    fn extract(&self, archive: &Path) -> Result<Extraction, BackendError> {
        let metadata = fs::metadata(archive).map_err(|_| {
            BackendError::new(format!(
                "Upload failed - archive not found at {}",
                archive.display()
            ))
        })?;

        let name = archive
            .file_name()
            .and_then(|value| value.to_str())
            .unwrap_or_default();
        let Some(stem) = archive_stem(name) else {
            return Err(BackendError::new(
                "Invalid file format - expected zip, tar, tar.gz, or tgz",
            ));
        };

        if metadata.len() > self.max_size_mb.saturating_mul(1024 * 1024) {
            return Err(BackendError::new(format!(
                "File too large - maximum size is {}MB",
                self.max_size_mb
            )));
        }

        let destination = self.destination_for(archive, stem);
        fs::create_dir_all(&destination).map_err(|_| {
            BackendError::new(format!(
                "Server error - could not prepare staging directory {}",
                destination.display()
            ))
        })?;

        diagnostics::record(format!(
            "backend: extraction staged archive={} destination={}",
            archive.display(),
            destination.display()
        ));

        Ok(Extraction {
            completed: true,
            destination: Some(destination),
        })
    }
}

fn archive_stem(name: &str) -> Option<&str> {
    ALLOWED_ARCHIVE_SUFFIXES
        .iter()
        .find_map(|suffix| name.strip_suffix(suffix))
        .filter(|stem| !stem.is_empty())
}
