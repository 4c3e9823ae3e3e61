//! Application-wide error types using thiserror.

use playstats_common::PlayStatsError;
use playstats_config::ConfigError;
use std::path::PathBuf;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Loading or analysing the input failed.
    #[error(transparent)]
    Analytics(#[from] PlayStatsError),

    /// The output destination could not be written.
    #[error("cannot write '{}': {source}", path.display())]
    Output {
        /// Destination path.
        path: PathBuf,
        /// Underlying cause.
        #[source]
        source: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Short category name for structured logs.
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Analytics(inner) => inner.category(),
            Self::Output { .. } | Self::Io(_) => "io",
        }
    }
}

/// Result type for the command line application.
pub type CliResult<T> = Result<T, CliError>;
