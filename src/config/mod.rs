//! Configuration management for salespipe
//!
//! Handles loading, saving, and validating configuration from TOML files.

mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "salespipe.toml";

/// Which kind of source the pipeline extracts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    File,
    Api,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::File => write!(f, "file"),
            SourceKind::Api => write!(f, "api"),
        }
    }
}

impl FromStr for SourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "file" => Ok(SourceKind::File),
            "api" => Ok(SourceKind::Api),
            _ => Err(Error::Config(format!("Unknown source kind: {}", s))),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Source configuration
    #[serde(default)]
    pub source: SourceConfig,

    /// Store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Scheduling configuration
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            store: StoreConfig::default(),
            schedule: ScheduleConfig::default(),
            log: LogConfig::default(),
        }
    }
}

/// Source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Source kind: "file" or "api"
    pub kind: SourceKind,

    /// Path of the delimited sales file (file source)
    #[serde(default = "default_source_path")]
    pub path: PathBuf,

    /// Endpoint URL (api source)
    #[serde(default = "default_source_url")]
    pub url: String,

    /// HTTP request timeout in seconds (api source)
    #[serde(default = "default_source_timeout")]
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::File,
            path: default_source_path(),
            url: default_source_url(),
            timeout_secs: default_source_timeout(),
        }
    }
}

/// Store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite database file
    #[serde(default = "default_db_file")]
    pub db_file: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_file: default_db_file(),
        }
    }
}

/// Scheduling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Pipeline cadence in minutes
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,

    /// Tick polling period in seconds
    #[serde(default = "default_poll_secs")]
    pub poll_secs: u64,

    /// Run the pipeline once at startup before entering the tick loop
    #[serde(default = "default_warm_start")]
    pub warm_start: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_minutes: default_interval_minutes(),
            poll_secs: default_poll_secs(),
            warm_start: default_warm_start(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// Optional append-only log file; console-only when unset
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a specific file path
    pub fn load(config_path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", config_path);

        if !config_path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        let content = std::fs::read_to_string(config_path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the given path, or from the default
    /// file name when unset, falling back to defaults if neither exists
    pub fn load_from(config_path: Option<&Path>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::load(default)
                } else {
                    debug!("No config file found, using defaults");
                    Ok(Config::default())
                }
            }
        }
    }

    /// Save configuration to file
    pub fn save(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.schedule.interval_minutes == 0 {
            return Err(Error::Config(
                "schedule.interval_minutes must be at least 1".to_string(),
            ));
        }
        if self.schedule.poll_secs == 0 {
            return Err(Error::Config(
                "schedule.poll_secs must be at least 1".to_string(),
            ));
        }
        if self.source.kind == SourceKind::Api && self.source.url.is_empty() {
            return Err(Error::Config("source.url must not be empty".to_string()));
        }
        Ok(())
    }
}
