//! Full load pipeline: bytes in, immutable dataset out.

use crate::ingest::{read_records, resolve_format};
use crate::model::Dataset;
use crate::normalize::normalize;
use crate::resolve::resolve_missing;
use chrono_tz::Tz;
use playstats_common::{PlayStatsError, Result};
use playstats_config::{Config, InputFormat};
use std::io::Read;
use std::path::Path;
use tracing::{info, instrument};

/// How an input is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Requested format; `Auto` is resolved per input.
    pub format: InputFormat,
    /// Zone for calendar fields and naive timestamps.
    pub time_zone: Tz,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            format: InputFormat::Auto,
            time_zone: Tz::UTC,
        }
    }
}

impl LoadOptions {
    /// Options taken from the input and analysis sections of `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            format: config.input.format,
            time_zone: config.analysis.time_zone()?,
        })
    }
}

/// Loads a dataset from in-memory content. `path`, when known, helps pick the format.
#[instrument(skip(bytes, options), fields(bytes = bytes.len(), format = %options.format, tz = %options.time_zone))]
pub fn load_bytes(bytes: &[u8], path: Option<&Path>, options: &LoadOptions) -> Result<Dataset> {
    let format = resolve_format(options.format, path, bytes);
    let records = read_records(bytes, format)?;
    let rows = normalize(&records, options.time_zone)?;
    let events = resolve_missing(rows);
    info!(plays = events.len(), %format, "Loaded listening history");
    Ok(Dataset::new(events, options.time_zone))
}

/// Loads a dataset from any reader.
pub fn load_reader<R: Read>(mut reader: R, options: &LoadOptions) -> Result<Dataset> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    load_bytes(&bytes, None, options)
}

/// Loads a dataset from a file.
pub fn load_path(path: &Path, options: &LoadOptions) -> Result<Dataset> {
    let bytes = read_input(path)?;
    load_bytes(&bytes, Some(path), options)
}

/// Reads an input file, naming it in the error.
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        PlayStatsError::with_source(format!("cannot read input file '{}'", path.display()), e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use playstats_common::test_utils::history_fixtures::{CsvHistoryBuilder, FixtureRow};
    use playstats_common::DataFormatError;

    #[test]
    fn test_load_csv_bytes() {
        let csv = CsvHistoryBuilder::new()
            .row(FixtureRow::play("2024-03-02 14:00:00", 180_000, "A", "X"))
            .row(FixtureRow::play("2024-03-03 09:00:00", 1_000, "B", "Y").without_artist())
            .build();
        let dataset = load_bytes(csv.as_bytes(), None, &LoadOptions::default()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.events()[1].artist_name, "Unknown Artist");
        assert_eq!(dataset.time_zone(), Tz::UTC);
    }

    #[test]
    fn test_load_reader_json() {
        let json = r#"[{"endTime": "2024-01-01 10:00", "msPlayed": 5000, "trackName": "T", "artistName": "A"}]"#;
        let dataset = load_reader(json.as_bytes(), &LoadOptions::default()).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.events()[0].album_name, "Unknown Album");
    }

    #[test]
    fn test_format_override() {
        let json = r#"[{"ts": "2024-01-01", "ms_played": 1}]"#;
        let options = LoadOptions {
            format: InputFormat::Csv,
            ..LoadOptions::default()
        };
        // read as CSV, the header has no ts column
        let err = load_bytes(json.as_bytes(), None, &options).unwrap_err();
        assert!(err.is_data_error(), "{err}");
    }

    #[test]
    fn test_bad_row_fails_whole_load() {
        let csv = CsvHistoryBuilder::new()
            .row(FixtureRow::play("2024-03-02 14:00:00", 1, "A", "X"))
            .row(FixtureRow::play("someday", 1, "B", "X"))
            .build();
        match load_bytes(csv.as_bytes(), None, &LoadOptions::default()) {
            Err(PlayStatsError::DataFormat(DataFormatError::InvalidTimestamp { row, value })) => {
                assert_eq!(row, 2);
                assert_eq!(value, "someday");
            }
            other => panic!("expected invalid timestamp, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_path(Path::new("/definitely/not/here.csv"), &LoadOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("not/here.csv"), "{err}");
    }

    #[test]
    fn test_options_from_config() {
        let mut config = Config::default();
        config.analysis.timezone = "Asia/Tokyo".to_string();
        config.input.format = InputFormat::Json;
        let options = LoadOptions::from_config(&config).unwrap();
        assert_eq!(options.time_zone, chrono_tz::Asia::Tokyo);
        assert_eq!(options.format, InputFormat::Json);

        config.analysis.timezone = "Mars/Olympus".to_string();
        assert!(LoadOptions::from_config(&config).is_err());
    }
}
