//! Test utilities and shared test helpers for playstats.
//!
//! Fixtures here build raw input text (CSV/JSON) rather than domain values so
//! that every crate in the workspace can exercise its own loading path.

use chrono::{DateTime, TimeZone, Utc};
use std::fmt::Write as _;
use std::sync::Once;

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(filter)
            .try_init();
    });
}

/// Test fixture for creating a UTC timestamp.
pub fn mock_timestamp(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
        .unwrap()
}

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

/// Create a temporary directory for tests that automatically cleans up.
#[cfg(feature = "tempfile")]
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Writes `contents` to `name` inside `dir` and returns the full path.
#[cfg(feature = "tempfile")]
pub fn write_fixture(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("Failed to write fixture file");
    path
}

/// Builders for listening-history input files.
pub mod history_fixtures {
    use super::*;

    /// Column order written by [`CsvHistoryBuilder`].
    pub const CSV_HEADER: &str =
        "ts,ms_played,track_name,artist_name,album_name,platform,skipped,spotify_track_uri";

    /// One input row; `None` fields are written empty.
    #[derive(Debug, Clone, Default)]
    pub struct FixtureRow {
        /// Raw timestamp text.
        pub ts: String,
        /// Raw duration text.
        pub ms_played: String,
        /// Track title.
        pub track: Option<String>,
        /// Artist name.
        pub artist: Option<String>,
        /// Album title.
        pub album: Option<String>,
        /// Client platform.
        pub platform: Option<String>,
        /// Raw skip flag text.
        pub skipped: Option<String>,
        /// Track URI.
        pub uri: Option<String>,
    }

    impl FixtureRow {
        /// A fully populated row.
        pub fn play(ts: &str, ms_played: u64, track: &str, artist: &str) -> Self {
            Self {
                ts: ts.to_string(),
                ms_played: ms_played.to_string(),
                track: Some(track.to_string()),
                artist: Some(artist.to_string()),
                album: Some(format!("{track} (Single)")),
                platform: Some("android".to_string()),
                skipped: Some("false".to_string()),
                uri: None,
            }
        }

        /// Sets the platform.
        #[must_use]
        pub fn on(mut self, platform: &str) -> Self {
            self.platform = Some(platform.to_string());
            self
        }

        /// Marks the play as skipped.
        #[must_use]
        pub fn skipped(mut self) -> Self {
            self.skipped = Some("true".to_string());
            self
        }

        /// Clears the artist.
        #[must_use]
        pub fn without_artist(mut self) -> Self {
            self.artist = None;
            self
        }
    }

    /// Accumulates rows and renders them as CSV text.
    #[derive(Debug, Clone, Default)]
    pub struct CsvHistoryBuilder {
        rows: Vec<FixtureRow>,
    }

    impl CsvHistoryBuilder {
        /// Empty builder.
        pub fn new() -> Self {
            Self::default()
        }

        /// Adds a row.
        #[must_use]
        pub fn row(mut self, row: FixtureRow) -> Self {
            self.rows.push(row);
            self
        }

        /// Renders header plus rows.
        pub fn build(&self) -> String {
            let mut out = String::from(CSV_HEADER);
            out.push('\n');
            for row in &self.rows {
                let cells = [
                    Some(row.ts.clone()),
                    Some(row.ms_played.clone()),
                    row.track.clone(),
                    row.artist.clone(),
                    row.album.clone(),
                    row.platform.clone(),
                    row.skipped.clone(),
                    row.uri.clone(),
                ];
                let line = cells
                    .iter()
                    .map(|cell| quote(cell.as_deref().unwrap_or("")))
                    .collect::<Vec<_>>()
                    .join(",");
                let _ = writeln!(out, "{line}");
            }
            out
        }
    }

    fn quote(cell: &str) -> String {
        if cell.contains([',', '"', '\n']) {
            format!("\"{}\"", cell.replace('"', "\"\""))
        } else {
            cell.to_string()
        }
    }
}

/// Proptest strategies shared by the property tests.
#[cfg(feature = "proptest")]
pub mod strategies {
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use proptest::prelude::*;

    /// Any second between 2015-01-01 and roughly 2030.
    pub fn naive_datetime() -> impl Strategy<Value = NaiveDateTime> {
        (0i64..(15 * 365 * 24 * 3600)).prop_map(|secs| {
            NaiveDate::from_ymd_opt(2015, 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .expect("valid epoch")
                + Duration::seconds(secs)
        })
    }

    /// Play durations from zero to three hours, in milliseconds.
    pub fn ms_played() -> impl Strategy<Value = u64> {
        0u64..(3 * 60 * 60 * 1000)
    }
}

#[cfg(test)]
mod tests {
    use super::history_fixtures::*;
    use super::*;

    #[test]
    fn test_csv_builder_quotes_and_blanks() {
        let csv = CsvHistoryBuilder::new()
            .row(FixtureRow::play("2024-03-02T14:00:00Z", 180_000, "A, B", "X").without_artist())
            .build();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(CSV_HEADER));
        assert_eq!(
            lines.next(),
            Some("2024-03-02T14:00:00Z,180000,\"A, B\",,\"A, B (Single)\",android,false,")
        );
    }

    #[test]
    fn test_mock_timestamp() {
        let ts = mock_timestamp(2024, 2, 29, 23, 59, 59);
        assert_eq!(ts.to_rfc3339(), "2024-02-29T23:59:59+00:00");
    }

    #[test]
    fn test_assert_approx_eq_within_tolerance() {
        assert_approx_eq(0.1 + 0.2, 0.3, 1e-9);
    }
}
