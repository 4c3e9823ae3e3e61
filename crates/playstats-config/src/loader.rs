//! Configuration loading with environment variable overrides.

use crate::Config;
use playstats_common::PlayStatsError;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_VAR: &str = "PLAYSTATS_CONFIG_PATH";

/// File names probed in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILES: [&str; 2] = ["playstats.yaml", "playstats.yml"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file '{path}': {source}")]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying cause.
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Invalid value for '{field}': {message}")]
    Validation {
        /// Dotted path of the offending field.
        field: String,
        /// What is wrong with it.
        message: String,
    },

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {message}")]
    EnvParse {
        /// Variable name.
        var: String,
        /// What is wrong with it.
        message: String,
    },
}

impl From<ConfigError> for PlayStatsError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, message } => Self::config(format!("{field}: {message}")),
            other => Self::config_with_source(other.to_string(), other),
        }
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Resolves, reads, overrides and validates the configuration.
    ///
    /// Lookup order: `explicit`, then `$PLAYSTATS_CONFIG_PATH`, then
    /// `playstats.yaml`/`playstats.yml` in the working directory, then defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(CONFIG_PATH_VAR).map(PathBuf::from))
            .or_else(|| {
                DEFAULT_CONFIG_FILES
                    .iter()
                    .map(PathBuf::from)
                    .find(|candidate| candidate.exists())
            });

        let mut config = match path {
            Some(path) => {
                info!(path = %path.display(), "Loading configuration file");
                Self::read_file(&path)?
            }
            None => {
                debug!("No configuration file found, using defaults");
                Config::default()
            }
        };

        Self::apply_overrides(&mut config, |var| env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a specific file, without environment overrides.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let config = Self::read_file(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    /// Parses YAML text. An empty document yields the defaults.
    pub fn from_yaml_str(content: &str) -> Result<Config, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    fn read_file(path: &Path) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Applies `PLAYSTATS_*` overrides, reading variables through `lookup`.
    pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(tz) = lookup("PLAYSTATS_TIMEZONE") {
            config.analysis.timezone = tz;
        }

        if let Some(level) = lookup("PLAYSTATS_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(file) = lookup("PLAYSTATS_LOG_FILE") {
            config.logging.file = Some(PathBuf::from(file));
        }

        if let Some(json) = lookup("PLAYSTATS_LOG_JSON") {
            config.logging.json = parse_flag("PLAYSTATS_LOG_JSON", &json)?;
        }

        if let Some(top) = lookup("PLAYSTATS_TOP_N") {
            let n: usize = top.trim().parse().map_err(|e| ConfigError::EnvParse {
                var: "PLAYSTATS_TOP_N".to_string(),
                message: format!("'{top}': {e}"),
            })?;
            config.analysis.top_artists = n;
            config.analysis.top_tracks = n;
        }

        Ok(())
    }
}

fn parse_flag(var: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::EnvParse {
            var: var.to_string(),
            message: format!("'{other}' is not a boolean"),
        }),
    }
}
