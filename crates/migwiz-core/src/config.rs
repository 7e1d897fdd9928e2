use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MAX_ARCHIVE_SIZE_MB: u64 = 100;
pub const DEFAULT_SERVICE_ENDPOINT: &str = "https://migrate.example.com";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MigwizConfig {
    pub version: u32,
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub archive: ArchiveConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    pub endpoint: String,
    /// Simulated round-trip latency applied to every service call.
    pub latency_ms: Option<u64>,
    /// Set to false to simulate a service outage.
    pub available: Option<bool>,
    #[serde(default)]
    pub accounts: Vec<AccountSpec>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountSpec {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArchiveConfig {
    pub max_size_mb: u64,
    pub staging_dir: Option<PathBuf>,
}

impl Default for MigwizConfig {
    fn default() -> Self {
        Self {
            version: 1,
            service: ServiceConfig::default(),
            archive: ArchiveConfig::default(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SERVICE_ENDPOINT.to_string(),
            latency_ms: None,
            available: None,
            accounts: Vec::new(),
        }
    }
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            max_size_mb: DEFAULT_MAX_ARCHIVE_SIZE_MB,
            staging_dir: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not resolve home directory for config path")]
    HomeDirectoryUnavailable,
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {message}")]
    Validation { message: String },
}

pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or(ConfigError::HomeDirectoryUnavailable)?;
    Ok(base_dirs
        .home_dir()
        .join(".config")
        .join("migwiz")
        .join("config.toml"))
}

pub fn load_config(path: &Path) -> Result<MigwizConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed: MigwizConfig = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_config(&parsed)?;
    Ok(parsed)
}

/// A missing config file is not an error; the wizard runs with defaults.
pub fn load_or_default(path: &Path) -> Result<MigwizConfig, ConfigError> {
    if !path.exists() {
        return Ok(MigwizConfig::default());
    }
    load_config(path)
}

pub fn validate_config(config: &MigwizConfig) -> Result<(), ConfigError> {
    if config.version != 1 {
        return Err(ConfigError::Validation {
            message: "version must be 1".to_string(),
        });
    }

    if config.service.endpoint.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "service endpoint must be non-empty".to_string(),
        });
    }

    if config.archive.max_size_mb == 0 {
        return Err(ConfigError::Validation {
            message: "archive max_size_mb must be greater than zero".to_string(),
        });
    }

    for (index, account) in config.service.accounts.iter().enumerate() {
        if account.username.trim().is_empty() {
            return Err(ConfigError::Validation {
                message: format!("account[{index}] username must be non-empty"),
            });
        }
        if account.password.is_empty() {
            return Err(ConfigError::Validation {
                message: format!("account[{index}] password must be non-empty"),
            });
        }
    }

    Ok(())
}
