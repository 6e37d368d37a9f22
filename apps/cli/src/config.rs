//! Configuration for the bcal CLI
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults
//! 2. `$XDG_CONFIG_HOME/bcal/config.toml` (if present)
//! 3. `BCAL_*` environment variables, `__` separates nested keys
//!    (e.g. `BCAL_LOGGING__LEVEL=debug`)
//!
//! Command-line flags are applied on top by `main`.

use std::path::PathBuf;

use anyhow::Context;
use bcal_engine::DEFAULT_SECTOR_SIZE;
use config::{Environment, File};
use serde::Deserialize;

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Sector size used for LBA:OFFSET display
    pub sector_size: u64,
    /// Print only the decimal byte count
    pub minimal: bool,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    /// JSON log lines instead of human-readable ones
    pub json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sector_size: DEFAULT_SECTOR_SIZE,
            minimal: false,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

impl Config {
    /// Load configuration from the default file location and environment
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(default_config_path())
    }

    pub fn load_from(path: Option<PathBuf>) -> anyhow::Result<Self> {
        let defaults = Config::default();
        let mut builder = config::Config::builder()
            .set_default("sector_size", defaults.sector_size)?
            .set_default("minimal", defaults.minimal)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.json", defaults.logging.json)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix("BCAL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?;

        settings
            .try_deserialize()
            .context("Failed to parse configuration")
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.sector_size == 0 {
            return Err("sector_size must be greater than 0".to_string());
        }
        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(format!(
                "logging.level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.logging.level
            ));
        }
        Ok(())
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("bcal").join("config.toml"))
}
