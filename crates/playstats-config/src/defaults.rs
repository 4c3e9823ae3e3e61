//! Default values for every configuration section.

use crate::schema::*;

/// Default number of rows in the ranked artist and track tables.
pub const DEFAULT_TOP_N: usize = 15;
/// Default number of rows in the shorter ranked tables.
pub const DEFAULT_SHORT_TOP_N: usize = 10;

impl Default for Config {
    fn default() -> Self {
        Self {
            input: InputConfig::default(),
            analysis: AnalysisConfig::default(),
            filter: FilterConfig::default(),
            logging: LoggingSettings::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            format: InputFormat::Auto,
            cache_capacity: 8,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            top_artists: DEFAULT_TOP_N,
            top_artists_by_minutes: DEFAULT_SHORT_TOP_N,
            top_tracks: DEFAULT_TOP_N,
            top_albums: DEFAULT_SHORT_TOP_N,
            longest_sessions: DEFAULT_SHORT_TOP_N,
            histogram_max_minutes: 10.0,
            histogram_bins: 50,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            pretty: false,
            file: None,
            include_spans: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty_json: true }
    }
}
