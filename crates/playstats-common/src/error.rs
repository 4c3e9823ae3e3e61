//! Error types and utilities for playstats.

use thiserror::Error;

/// Result type alias for playstats operations.
pub type Result<T> = std::result::Result<T, PlayStatsError>;

/// Fatal problems found while reading or normalizing a listening-history file.
///
/// Rows are numbered from 1, counting data rows only (the CSV header is not a row).
/// Any of these aborts the whole load; no partial dataset is ever produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataFormatError {
    /// A required column is not present in the input header.
    #[error("required column '{column}' is missing from the input")]
    MissingColumn {
        /// Canonical column name.
        column: String,
    },

    /// A required value is empty or absent for one row.
    #[error("row {row}: required value '{column}' is missing")]
    MissingValue {
        /// 1-based data row.
        row: usize,
        /// Canonical column name.
        column: String,
    },

    /// The timestamp could not be parsed.
    #[error("row {row}: cannot parse timestamp '{value}'")]
    InvalidTimestamp {
        /// 1-based data row.
        row: usize,
        /// Raw value as read.
        value: String,
    },

    /// The play duration is not an integral number of milliseconds.
    #[error("row {row}: cannot parse ms_played '{value}' as a whole number of milliseconds")]
    InvalidDuration {
        /// 1-based data row.
        row: usize,
        /// Raw value as read.
        value: String,
    },

    /// The play duration is below zero.
    #[error("row {row}: ms_played '{value}' is negative")]
    NegativeDuration {
        /// 1-based data row.
        row: usize,
        /// Raw value as read.
        value: String,
    },

    /// A boolean column holds something other than a recognized truth value.
    #[error("row {row}: cannot parse '{value}' in column '{column}' as a boolean")]
    InvalidBoolean {
        /// 1-based data row.
        row: usize,
        /// Canonical column name.
        column: String,
        /// Raw value as read.
        value: String,
    },

    /// The file is structurally broken (bad quoting, invalid JSON, wrong shape).
    #[error("{}malformed input: {message}", .row.map(|r| format!("row {r}: ")).unwrap_or_default())]
    Malformed {
        /// 1-based data row, when the reader could attribute the failure.
        row: Option<usize>,
        /// Reader-provided description.
        message: String,
    },
}

impl DataFormatError {
    /// The 1-based row the error refers to, if any.
    pub const fn row(&self) -> Option<usize> {
        match self {
            Self::MissingColumn { .. } => None,
            Self::MissingValue { row, .. }
            | Self::InvalidTimestamp { row, .. }
            | Self::InvalidDuration { row, .. }
            | Self::NegativeDuration { row, .. }
            | Self::InvalidBoolean { row, .. } => Some(*row),
            Self::Malformed { row, .. } => *row,
        }
    }
}

impl From<csv::Error> for DataFormatError {
    fn from(err: csv::Error) -> Self {
        // csv positions count the header as record 0
        let row = err
            .position()
            .and_then(|pos| usize::try_from(pos.record()).ok())
            .filter(|record| *record > 0);
        Self::Malformed {
            row,
            message: err.to_string(),
        }
    }
}

/// Main error type for playstats operations.
#[derive(Error, Debug)]
pub enum PlayStatsError {
    /// The input file could not be turned into a dataset.
    #[error("Data format error: {0}")]
    DataFormat(#[from] DataFormatError),

    /// Configuration related errors.
    #[error("Configuration error: {message}")]
    Config {
        /// Human readable description.
        message: String,
        /// Underlying cause.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O related errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Validation errors for user input.
    #[error("Validation error: {message}")]
    Validation {
        /// Human readable description.
        message: String,
        /// Offending field, if one can be named.
        field: Option<String>,
    },

    /// Generic error with custom message.
    #[error("{message}")]
    Generic {
        /// Human readable description.
        message: String,
        /// Underlying cause.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PlayStatsError {
    /// Create a new generic error with a custom message
    pub fn new(msg: impl Into<String>) -> Self {
        Self::Generic {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new generic error with a custom message and source
    pub fn with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Generic {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: None,
        }
    }

    /// Create a new validation error naming the offending field
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Whether the error comes from bad input data rather than the environment.
    pub const fn is_data_error(&self) -> bool {
        matches!(self, Self::DataFormat(_))
    }

    /// Short category name, used as a structured logging field.
    pub const fn category(&self) -> &'static str {
        match self {
            Self::DataFormat(_) => "data_format",
            Self::Config { .. } => "config",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
            Self::Validation { .. } => "validation",
            Self::Generic { .. } => "generic",
        }
    }
}

impl From<serde_yaml::Error> for PlayStatsError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::config_with_source("failed to parse YAML", err)
    }
}

impl From<csv::Error> for PlayStatsError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            match err.into_kind() {
                csv::ErrorKind::Io(io) => Self::Io(io),
                other => Self::new(format!("CSV error: {other:?}")),
            }
        } else {
            Self::DataFormat(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_format_messages_name_row_and_value() {
        let err = DataFormatError::InvalidTimestamp {
            row: 7,
            value: "yesterday".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("row 7"));
        assert!(msg.contains("yesterday"));
        assert_eq!(err.row(), Some(7));
    }

    #[test]
    fn test_malformed_without_row() {
        let err = DataFormatError::Malformed {
            row: None,
            message: "expected array".to_string(),
        };
        assert_eq!(err.to_string(), "malformed input: expected array");
        assert_eq!(err.row(), None);

        let err = DataFormatError::Malformed {
            row: Some(3),
            message: "bad quote".to_string(),
        };
        assert_eq!(err.to_string(), "row 3: malformed input: bad quote");
    }

    #[test]
    fn test_missing_column_has_no_row() {
        let err = DataFormatError::MissingColumn {
            column: "ts".to_string(),
        };
        assert_eq!(err.row(), None);
        assert!(err.to_string().contains("'ts'"));
    }

    #[test]
    fn test_wrapping_and_categories() {
        let err: PlayStatsError = DataFormatError::MissingColumn {
            column: "ms_played".to_string(),
        }
        .into();
        assert!(err.is_data_error());
        assert_eq!(err.category(), "data_format");

        let err = PlayStatsError::validation_field("must be positive", "top_tracks");
        assert!(!err.is_data_error());
        assert_eq!(err.category(), "validation");
        assert_eq!(err.to_string(), "Validation error: must be positive");

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: PlayStatsError = io.into();
        assert_eq!(err.category(), "io");
    }
}
