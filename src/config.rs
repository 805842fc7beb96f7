//! # Configuration Management
//!
//! Loads output preferences for the `lune` command from `lune-config.toml`.
//! A missing or malformed file is not an error: defaults are used and the
//! reason is logged.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::quarters::PhaseSelector;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "lune-config.toml";

/// Application configuration loaded from lune-config.toml
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// How results are printed
    pub output: OutputConfig,
    /// Defaults for the `range` command
    pub range: RangeConfig,
}

/// Result serialisation style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Output formatting options
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Text or JSON
    pub format: OutputFormat,
    /// chrono strftime pattern for instants in text output
    pub time_format: String,
    /// Decimal places for fractional values in text output
    pub precision: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            format: OutputFormat::Text,
            time_format: "%Y-%m-%d %H:%M:%S UTC".to_string(),
            precision: 4,
        }
    }
}

/// Defaults for phase range queries
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RangeConfig {
    /// Phase listed when the command line names none
    pub default_phase: PhaseSelector,
}

impl Default for RangeConfig {
    fn default() -> Self {
        RangeConfig {
            default_phase: PhaseSelector::Full,
        }
    }
}

impl Config {
    /// Load configuration from lune-config.toml in the working directory
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!(path = %path.display(), "loaded configuration");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "invalid config file, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                info!(path = %path.display(), "no config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Write the configuration as pretty TOML
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), contents)?;
        info!(path = %path.as_ref().display(), "configuration saved");
        Ok(())
    }
}
