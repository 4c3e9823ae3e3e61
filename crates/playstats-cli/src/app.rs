//! Runs subcommands against a loaded configuration.

use crate::cli::{Command, ExportArgs, InputArgs, ReportArgs, SelectionArgs};
use crate::error::{CliError, CliResult};
use playstats_analytics::{
    write_csv, DashboardReport, Dataset, DatasetCache, Facets, FilterCriteria, JsonRenderer,
    LoadOptions, ReportOptions, ReportRenderer, Session, SummaryRenderer,
};
use playstats_common::PlayStatsError;
use playstats_config::Config;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// The application: configuration plus the dataset cache.
pub struct App {
    config: Arc<Config>,
    cache: DatasetCache,
}

impl App {
    /// Creates an application from validated configuration.
    pub fn new(config: Config) -> Self {
        let cache = DatasetCache::new(config.input.cache_capacity);
        Self {
            config: Arc::new(config),
            cache,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs one subcommand, writing to its output file or stdout.
    pub fn run(&self, command: &Command) -> CliResult<()> {
        match command {
            Command::Report(args) => {
                with_output(args.output.as_deref(), |out| self.report(args, out).map(drop))
            }
            Command::Facets(args) => with_output(None, |out| self.facets(args, out).map(drop)),
            Command::Export(args) => {
                with_output(args.output.as_deref(), |out| self.export(args, out).map(drop))
            }
        }
    }

    /// Loads the input through the cache.
    pub fn load(&self, input: &InputArgs) -> CliResult<Arc<Dataset>> {
        let mut options = LoadOptions::from_config(&self.config)?;
        if let Some(format) = input.format {
            options.format = format;
        }
        Ok(self.cache.load_path(&input.input, &options)?)
    }

    /// A session over the input with command line selection, falling back to
    /// the configured defaults.
    pub fn session(&self, input: &InputArgs, selection: &SelectionArgs) -> CliResult<Session> {
        let dataset = self.load(input)?;
        let defaults = &self.config.filter;
        let criteria = FilterCriteria::resolve(
            &dataset,
            selection.from.or(defaults.from),
            selection.to.or(defaults.to),
            selection.platforms().or(defaults.platforms.as_deref()),
        );
        debug!(start = %criteria.start, end = %criteria.end, platforms = criteria.platforms.len(), "Selection");
        Ok(Session::new(dataset).with_criteria(criteria))
    }

    /// Builds and renders the dashboard report.
    #[instrument(skip_all, fields(input = %args.input.input.display()))]
    pub fn report(&self, args: &ReportArgs, out: &mut dyn Write) -> CliResult<DashboardReport> {
        let session = self.session(&args.input, &args.selection)?;
        let report = session.report(&ReportOptions::from(&self.config.analysis));

        let renderer: Box<dyn ReportRenderer> = if args.summary {
            Box::new(SummaryRenderer::default())
        } else {
            Box::new(JsonRenderer::new(
                self.config.output.pretty_json && !args.compact,
            ))
        };
        debug!(renderer = renderer.name(), "Rendering report");
        renderer.render(&report, out)?;

        info!(
            plays = report.overview.total_plays,
            warnings = report.warnings.len(),
            "Report finished"
        );
        Ok(report)
    }

    /// Writes the facets of the whole input as JSON.
    pub fn facets(&self, args: &InputArgs, out: &mut dyn Write) -> CliResult<Facets> {
        let dataset = self.load(args)?;
        let facets = Facets::of(&dataset);
        if self.config.output.pretty_json {
            serde_json::to_writer_pretty(&mut *out, &facets)
        } else {
            serde_json::to_writer(&mut *out, &facets)
        }
        .map_err(PlayStatsError::from)?;
        writeln!(out)?;
        Ok(facets)
    }

    /// Writes the selected rows as CSV. Returns the row count.
    #[instrument(skip_all, fields(input = %args.input.input.display()))]
    pub fn export(&self, args: &ExportArgs, out: &mut dyn Write) -> CliResult<usize> {
        let session = self.session(&args.input, &args.selection)?;
        let rows = write_csv(&session.view(), out)?;
        info!(rows, "Export finished");
        Ok(rows)
    }
}

fn with_output<F>(path: Option<&Path>, write: F) -> CliResult<()>
where
    F: FnOnce(&mut dyn Write) -> CliResult<()>,
{
    let Some(path) = path else {
        let mut stdout = io::stdout().lock();
        write(&mut stdout)?;
        return Ok(stdout.flush()?);
    };

    let output_error = |source| CliError::Output {
        path: path.to_path_buf(),
        source,
    };
    let mut file = BufWriter::new(File::create(path).map_err(output_error)?);
    write(&mut file)?;
    file.flush().map_err(output_error)?;
    info!(path = %path.display(), "Wrote output");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use playstats_common::test_utils::history_fixtures::{CsvHistoryBuilder, FixtureRow};
    use playstats_common::test_utils::{create_temp_dir, write_fixture};
    use std::path::PathBuf;

    fn input(path: PathBuf) -> InputArgs {
        InputArgs {
            input: path,
            format: None,
        }
    }

    #[test]
    fn test_configured_filter_applies_when_flags_absent() {
        let dir = create_temp_dir();
        let csv = CsvHistoryBuilder::new()
            .row(FixtureRow::play("2024-01-01 10:00:00", 60_000, "a", "X").on("ios"))
            .row(FixtureRow::play("2024-01-02 10:00:00", 60_000, "b", "X").on("web"))
            .build();
        let path = write_fixture(&dir, "h.csv", &csv);

        let mut config = Config::default();
        config.filter.platforms = Some(vec!["web".to_string()]);
        let app = App::new(config);

        let session = app
            .session(&input(path.clone()), &SelectionArgs::default())
            .unwrap();
        assert_eq!(session.view().len(), 1);

        let flags = SelectionArgs {
            platforms: vec!["ios".to_string(), "web".to_string()],
            ..SelectionArgs::default()
        };
        assert_eq!(app.session(&input(path), &flags).unwrap().view().len(), 2);
    }

    #[test]
    fn test_format_flag_overrides_detection() {
        let dir = create_temp_dir();
        let path = write_fixture(&dir, "history.txt", "[{\"ts\": \"2024-01-01\", \"ms_played\": 5}]");
        let app = App::new(Config::default());

        let forced = InputArgs {
            input: path.clone(),
            format: Some(playstats_config::InputFormat::Csv),
        };
        assert!(app.load(&forced).is_err());
        assert_eq!(app.load(&input(path)).unwrap().len(), 1);
    }

    #[test]
    fn test_facets_written_as_json() {
        let dir = create_temp_dir();
        let csv = CsvHistoryBuilder::new()
            .row(FixtureRow::play("2024-01-03 10:00:00", 60_000, "a", "X").on("web"))
            .row(FixtureRow::play("2024-01-01 10:00:00", 60_000, "b", "X").on("ios"))
            .build();
        let path = write_fixture(&dir, "h.csv", &csv);
        let app = App::new(Config::default());

        let mut out = Vec::new();
        let facets = app.facets(&input(path), &mut out).unwrap();
        assert_eq!(facets.rows, 2);
        assert_eq!(facets.first_date, chrono::NaiveDate::from_ymd_opt(2024, 1, 1));

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["platforms"], serde_json::json!(["ios", "web"]));
        assert_eq!(value["last_date"], "2024-01-03");
    }

    #[test]
    fn test_unwritable_output_is_reported() {
        let dir = create_temp_dir();
        let target = dir.path().join("missing").join("out.json");
        let err = with_output(Some(target.as_path()), |_| Ok(())).unwrap_err();
        assert!(matches!(err, CliError::Output { ref path, .. } if path == &target));
    }
}
