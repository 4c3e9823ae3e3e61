//! Command line arguments.

use crate::error::{CliError, CliResult};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use playstats_config::{Config, InputFormat};
use std::path::PathBuf;

/// Listening-history statistics
#[derive(Parser, Debug)]
#[command(name = "playstats", author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "PLAYSTATS_CONFIG_PATH")]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `playstats_analytics=trace`
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// IANA time zone used for dates and hours
    #[arg(long, global = true)]
    pub timezone: Option<String>,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the dashboard report for a selection
    Report(ReportArgs),
    /// List platforms, date bounds and row count
    Facets(InputArgs),
    /// Write normalized rows with every derived column as CSV
    Export(ExportArgs),
}

/// The history file and how to read it.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Streaming history export (CSV or JSON)
    pub input: PathBuf,

    /// Input format: auto, csv or json
    #[arg(long)]
    pub format: Option<InputFormat>,
}

/// Date range and platform selection.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// First day to include (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Platform to include, repeatable; `(none)` selects plays without one
    #[arg(long = "platform", value_name = "PLATFORM")]
    pub platforms: Vec<String>,
}

impl SelectionArgs {
    /// Platforms given on the command line, if any.
    pub fn platforms(&self) -> Option<&[String]> {
        (!self.platforms.is_empty()).then_some(self.platforms.as_slice())
    }
}

/// Arguments of `report`.
#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    #[allow(missing_docs)]
    pub input: InputArgs,

    #[command(flatten)]
    #[allow(missing_docs)]
    pub selection: SelectionArgs,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print a plain-text summary instead of JSON
    #[arg(long, conflicts_with = "compact")]
    pub summary: bool,

    /// Single-line JSON
    #[arg(long)]
    pub compact: bool,
}

/// Arguments of `export`.
#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    #[allow(missing_docs)]
    pub input: InputArgs,

    #[command(flatten)]
    #[allow(missing_docs)]
    pub selection: SelectionArgs,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl Cli {
    /// Applies the global flags on top of file and environment settings,
    /// then validates the result again.
    pub fn apply_to(&self, config: &mut Config) -> CliResult<()> {
        if let Some(level) = &self.log_level {
            config.logging.level.clone_from(level);
        }
        if let Some(tz) = &self.timezone {
            config.analysis.timezone.clone_from(tz);
        }
        config.validate().map_err(CliError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_report_arguments() {
        let cli = Cli::try_parse_from([
            "playstats",
            "--timezone",
            "Europe/Berlin",
            "report",
            "history.csv",
            "--from",
            "2024-01-01",
            "--platform",
            "ios",
            "--platform",
            "(none)",
            "--format",
            "csv",
            "--summary",
        ])
        .unwrap();

        assert_eq!(cli.timezone.as_deref(), Some("Europe/Berlin"));
        let Command::Report(args) = cli.command else {
            panic!("expected report");
        };
        assert_eq!(args.input.input, PathBuf::from("history.csv"));
        assert_eq!(args.input.format, Some(InputFormat::Csv));
        assert_eq!(args.selection.from, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(args.selection.to, None);
        assert_eq!(
            args.selection.platforms(),
            Some(&["ios".to_string(), "(none)".to_string()][..])
        );
        assert!(args.summary);
    }

    #[test]
    fn test_bad_date_is_rejected() {
        assert!(Cli::try_parse_from(["playstats", "report", "h.csv", "--to", "yesterday"]).is_err());
    }

    #[test]
    fn test_summary_conflicts_with_compact() {
        assert!(
            Cli::try_parse_from(["playstats", "report", "h.csv", "--summary", "--compact"])
                .is_err()
        );
    }

    #[test]
    fn test_global_flags_override_config() {
        let cli = Cli::try_parse_from(["playstats", "facets", "h.json", "-l", "debug"]).unwrap();
        let mut config = Config::default();
        cli.apply_to(&mut config).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.analysis.timezone, Config::default().analysis.timezone);
    }

    #[test]
    fn test_unknown_timezone_fails_validation() {
        let cli =
            Cli::try_parse_from(["playstats", "--timezone", "Mars/Olympus", "facets", "h.csv"])
                .unwrap();
        let err = cli.apply_to(&mut Config::default()).unwrap_err();
        assert_eq!(err.category(), "config");
    }
}
