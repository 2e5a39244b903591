//! # Configuration Management
//!
//! Loads `tide-config.toml`: which station to predict for by default, where
//! to read station constants from, and how to print predictions.
//! A missing or malformed file is not an error; defaults are used instead.

use crate::station::DEFAULT_STATION;
use crate::Method;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "tide-config.toml";

/// Application configuration loaded from tide-config.toml
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Station selection and data source
    pub station: StationConfig,
    /// Output options
    #[serde(default)]
    pub output: OutputConfig,
}

/// Station selection
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StationConfig {
    /// Station name as listed in the station table (case-insensitive)
    pub name: String,
    /// Optional TOML station table replacing the built-in one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
}

/// How predictions are computed and printed
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Spacing of the printed table, in minutes
    pub step_minutes: u32,
    /// Direct harmonic sum or daily species resultants
    pub method: Method,
    /// Draw an ASCII curve under the table
    pub ascii: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            step_minutes: 60,
            method: Method::Direct,
            ascii: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            station: StationConfig {
                name: DEFAULT_STATION.to_string(),
                data_file: None,
            },
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from tide-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
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
                    info!(station = %config.station.name, "loaded configuration");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), "invalid config file format: {e}");
                    warn!("using default configuration ({DEFAULT_STATION})");
                    Self::default()
                }
            },
            Err(_) => {
                info!(
                    path = %path.display(),
                    "no config file found, using default configuration ({DEFAULT_STATION})"
                );
                Self::default()
            }
        }
    }

    /// Write the configuration to `path`
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), contents)?;
        info!(path = %path.as_ref().display(), "configuration saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.station.name, "BREST");
        assert_eq!(config.station.data_file, None);
        assert_eq!(config.output.step_minutes, 60);
        assert_eq!(config.output.method, Method::Direct);
        assert!(!config.output.ascii);
    }

    #[test]
    fn test_config_roundtrip() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.station.name = "CONCARNEAU".into();
        config.station.data_file = Some(PathBuf::from("/srv/tides/stations.toml"));
        config.output.method = Method::Species;

        config.save_to_path(file.path()).unwrap();
        assert_eq!(Config::load_from_path(file.path()), config);
    }

    #[test]
    fn test_partial_file_uses_output_defaults() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "[station]\nname = \"Concarneau\"\n").unwrap();

        let config = Config::load_from_path(file.path());
        assert_eq!(config.station.name, "Concarneau");
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "[output]\nmethod = \"tabular\"\n").unwrap();
        assert_eq!(Config::load_from_path(file.path()), Config::default());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let config = Config::load_from_path("/nonexistent/path");
        assert_eq!(config, Config::default());
    }
}
