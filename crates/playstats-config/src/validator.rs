//! Semantic validation of a deserialized configuration.

use crate::{schema::Config, ConfigError};
use playstats_common::{is_valid_filter, PlayStatsError};

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration, converting failures into the workspace error type.
    pub fn validate(config: &Config) -> playstats_common::Result<()> {
        Self::check(config).map_err(PlayStatsError::from)
    }

    /// Validates a configuration, returning the first problem found.
    pub fn check(config: &Config) -> Result<(), ConfigError> {
        let analysis = &config.analysis;
        analysis.time_zone()?;

        let limits = [
            ("analysis.top_artists", analysis.top_artists),
            ("analysis.top_artists_by_minutes", analysis.top_artists_by_minutes),
            ("analysis.top_tracks", analysis.top_tracks),
            ("analysis.top_albums", analysis.top_albums),
            ("analysis.longest_sessions", analysis.longest_sessions),
            ("analysis.histogram_bins", analysis.histogram_bins),
        ];
        for (field, value) in limits {
            if value == 0 {
                return Err(invalid(field, "must be at least 1"));
            }
        }

        if !(analysis.histogram_max_minutes.is_finite() && analysis.histogram_max_minutes > 0.0) {
            return Err(invalid(
                "analysis.histogram_max_minutes",
                "must be a positive number of minutes",
            ));
        }

        if config.input.cache_capacity == 0 {
            return Err(invalid("input.cache_capacity", "must be at least 1"));
        }

        if !is_valid_filter(&config.logging.level) {
            return Err(invalid(
                "logging.level",
                &format!("'{}' is not a valid log filter", config.logging.level),
            ));
        }

        if let Some(platforms) = &config.filter.platforms {
            if platforms.iter().any(|p| p.trim().is_empty()) {
                return Err(invalid("filter.platforms", "platform names cannot be blank"));
            }
        }

        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::Validation {
        field: field.to_string(),
        message: message.to_string(),
    }
}
