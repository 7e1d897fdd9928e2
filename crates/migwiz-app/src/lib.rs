use anyhow::{Context, Result, anyhow};
use migwiz_core::backend::{ArchiveExtractor, Authenticator};
use migwiz_core::config::{MigwizConfig, load_or_default, resolve_config_path};

pub mod migrate;
pub mod navigate;

pub struct App<'a> {
    pub authenticator: &'a dyn Authenticator,
    pub extractor: &'a dyn ArchiveExtractor,
}

impl<'a> App<'a> {
    pub fn new(authenticator: &'a dyn Authenticator, extractor: &'a dyn ArchiveExtractor) -> Self {
        Self {
            authenticator,
            extractor,
        }
    }
}

pub fn load_config() -> Result<MigwizConfig> {
    let config_path = resolve_config_path().context("failed to resolve config path")?;
    load_or_default(&config_path).map_err(|error| {
        anyhow!(
            "invalid config at {}: {error}\nFix the config and retry. See README.md for setup instructions.",
            config_path.display()
        )
    })
}
