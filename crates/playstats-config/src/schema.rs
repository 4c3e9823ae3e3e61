//! Configuration schema definitions using serde.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for playstats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Input configuration.
    pub input: InputConfig,
    /// Analysis configuration.
    pub analysis: AnalysisConfig,
    /// Default filter selection.
    pub filter: FilterConfig,
    /// Logging configuration.
    pub logging: LoggingSettings,
    /// Output configuration.
    pub output: OutputConfig,
}

/// How the input file is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// Decide from the file extension, then from the content.
    #[default]
    Auto,
    /// Comma separated values with a header row.
    Csv,
    /// A JSON array of play objects.
    Json,
}

impl std::str::FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown input format '{other}' (expected auto, csv or json)")),
        }
    }
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Csv => "csv",
            Self::Json => "json",
        })
    }
}

/// Input configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// Input format.
    pub format: InputFormat,
    /// Maximum number of distinct inputs whose normalized dataset is kept in memory.
    pub cache_capacity: u64,
}

/// Analysis configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// IANA time zone used for dates, hours and weekdays.
    pub timezone: String,
    /// Entries in the top artists by play count table.
    pub top_artists: usize,
    /// Entries in the top artists by listening time table.
    pub top_artists_by_minutes: usize,
    /// Entries in the top tracks table.
    pub top_tracks: usize,
    /// Entries in the top albums table.
    pub top_albums: usize,
    /// Entries in the longest sessions table.
    pub longest_sessions: usize,
    /// Upper bound of the duration histogram, in minutes.
    pub histogram_max_minutes: f64,
    /// Number of bins in the duration histogram.
    pub histogram_bins: usize,
}

/// Default filter selection applied when none is given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// First included date; defaults to the earliest date in the data.
    pub from: Option<NaiveDate>,
    /// Last included date; defaults to the latest date in the data.
    pub to: Option<NaiveDate>,
    /// Allowed platforms; defaults to every platform in the data.
    pub platforms: Option<Vec<String>>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSettings {
    /// `EnvFilter` directive string.
    pub level: String,
    /// Emit JSON lines.
    pub json: bool,
    /// Use the multi-line pretty formatter.
    pub pretty: bool,
    /// Write logs to this file instead of stderr.
    pub file: Option<PathBuf>,
    /// Log span open/close events.
    pub include_spans: bool,
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    pub pretty_json: bool,
}

impl LoggingSettings {
    /// Converts into the logging layer's configuration.
    pub fn to_logging_config(&self) -> playstats_common::LoggingConfig {
        playstats_common::LoggingConfig {
            level: self.level.clone(),
            json_format: self.json,
            pretty_format: self.pretty,
            file_path: self.file.clone(),
            include_spans: self.include_spans,
            ..playstats_common::LoggingConfig::default()
        }
    }
}

impl AnalysisConfig {
    /// Parses the configured time zone.
    pub fn time_zone(&self) -> Result<chrono_tz::Tz, crate::ConfigError> {
        self.timezone
            .parse::<chrono_tz::Tz>()
            .map_err(|e| crate::ConfigError::Validation {
                field: "analysis.timezone".to_string(),
                message: format!("unknown time zone '{}': {e}", self.timezone),
            })
    }
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), crate::ConfigError> {
        crate::ConfigValidator::check(self)
    }
}
