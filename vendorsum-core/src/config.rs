//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/vendorsum/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/vendorsum/` (~/.config/vendorsum/)
//! - Data: `$XDG_DATA_HOME/vendorsum/` (~/.local/share/vendorsum/)
//! - State/Logs: `$XDG_STATE_HOME/vendorsum/` (~/.local/state/vendorsum/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Database location
    #[serde(default)]
    pub database: DatabaseConfig,

    /// CSV directory ingestion settings
    #[serde(default)]
    pub ingest: IngestConfig,

    /// Vendor summary settings
    #[serde(default)]
    pub summary: SummaryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database configuration
#[derive(Debug, Deserialize, Default)]
pub struct DatabaseConfig {
    /// SQLite file to read from and write to (defaults to the XDG data dir)
    pub path: Option<PathBuf>,
}

/// CSV directory ingestion configuration
#[derive(Debug, Deserialize)]
pub struct IngestConfig {
    /// Directory scanned for `*.csv` files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Maximum rows per INSERT statement
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            batch_size: default_batch_size(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_batch_size() -> usize {
    50_000
}

/// Vendor summary configuration
#[derive(Debug, Deserialize)]
pub struct SummaryConfig {
    /// Destination table, replaced on every run
    #[serde(default = "default_summary_table")]
    pub table: String,

    /// How ratios with a zero denominator are represented
    #[serde(default)]
    pub ratio_policy: RatioPolicy,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            table: default_summary_table(),
            ratio_policy: RatioPolicy::default(),
        }
    }
}

fn default_summary_table() -> String {
    "vendor_sales_summary".to_string()
}

/// Policy for ratios whose denominator is zero
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RatioPolicy {
    /// Keep the IEEE result (infinity or NaN)
    #[default]
    Propagate,
    /// Report the ratio as zero
    Zero,
}

impl RatioPolicy {
    /// Divide `numerator` by `denominator` under this policy.
    pub fn divide(self, numerator: f64, denominator: f64) -> f64 {
        match self {
            RatioPolicy::Propagate => numerator / denominator,
            RatioPolicy::Zero if denominator == 0.0 => 0.0,
            RatioPolicy::Zero => numerator / denominator,
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory holding the log files (defaults to the XDG state dir)
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
        }
    }
}

fn default_log_level() -> String {
    "debug".to_string()
}

impl LoggingConfig {
    /// Directory the log files are written to
    pub fn log_dir(&self) -> PathBuf {
        self.directory.clone().unwrap_or_else(Config::state_dir)
    }
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.ingest.batch_size == 0 {
            return Err(Error::Config(
                "ingest.batch_size must be at least 1".to_string(),
            ));
        }
        if self.summary.table.trim().is_empty() {
            return Err(Error::Config("summary.table must not be empty".to_string()));
        }
        Ok(())
    }

    /// Resolve the database path: explicit override, then config, then default.
    pub fn resolve_database_path(&self, override_path: Option<&Path>) -> PathBuf {
        override_path
            .map(Path::to_path_buf)
            .or_else(|| self.database.path.clone())
            .unwrap_or_else(Self::database_path)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/vendorsum/config.toml` (~/.config/vendorsum/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("vendorsum").join("config.toml")
    }

    /// Returns the data directory path (for SQLite database)
    ///
    /// `$XDG_DATA_HOME/vendorsum/` (~/.local/share/vendorsum/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("vendorsum")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/vendorsum/` (~/.local/state/vendorsum/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("vendorsum")
    }

    /// Returns the default database file path
    ///
    /// `$XDG_DATA_HOME/vendorsum/inventory.db` (~/.local/share/vendorsum/inventory.db)
    pub fn database_path() -> PathBuf {
        Self::data_dir().join("inventory.db")
    }
}
