//! CSV export of normalized plays with every derived column.

use crate::features::{DurationBucket, TimeOfDay};
use crate::filter::FilteredView;
use crate::model::PlayEvent;
use chrono::{NaiveDate, SecondsFormat};
use playstats_common::Result;
use serde::Serialize;
use std::io::Write;
use tracing::{debug, instrument};

/// One exported row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow<'a> {
    /// RFC 3339 timestamp in the analysis time zone.
    pub ts: String,
    /// Milliseconds played.
    pub ms_played: u64,
    /// Track title.
    pub track_name: &'a str,
    /// Artist name.
    pub artist_name: &'a str,
    /// Album title.
    pub album_name: &'a str,
    /// Platform, empty when absent.
    pub platform: Option<&'a str>,
    /// Skip flag, empty when absent.
    pub skipped: Option<bool>,
    /// Track identifier, empty when absent.
    pub spotify_track_uri: Option<&'a str>,
    /// Calendar day.
    pub date: NaiveDate,
    /// Hour of day.
    pub hour: u32,
    /// Weekday name.
    pub weekday: &'static str,
    /// Month name.
    pub month: &'static str,
    /// Calendar year.
    pub year: i32,
    /// Duration in minutes.
    pub minutes_played: f64,
    /// Duration in seconds.
    pub seconds_played: f64,
    /// Time-of-day bucket.
    pub time_of_day: TimeOfDay,
    /// Saturday or Sunday.
    pub is_weekend: bool,
    /// Duration bucket.
    pub duration_bucket: DurationBucket,
}

impl<'a> From<&'a PlayEvent> for ExportRow<'a> {
    fn from(event: &'a PlayEvent) -> Self {
        let derived = event.derived();
        Self {
            ts: event.timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            ms_played: event.ms_played,
            track_name: &event.track_name,
            artist_name: &event.artist_name,
            album_name: &event.album_name,
            platform: event.platform.as_deref(),
            skipped: event.skipped,
            spotify_track_uri: event.track_uri.as_deref(),
            date: derived.date,
            hour: derived.hour,
            weekday: derived.weekday,
            month: derived.month,
            year: derived.year,
            minutes_played: derived.minutes_played,
            seconds_played: derived.seconds_played,
            time_of_day: derived.time_of_day,
            is_weekend: derived.is_weekend,
            duration_bucket: derived.duration_bucket,
        }
    }
}

/// Writes the view as CSV with a header row. Returns the number of data rows.
#[instrument(skip_all, fields(rows = view.len()))]
pub fn write_csv<W: Write>(view: &FilteredView<'_>, writer: W) -> Result<usize> {
    let mut csv = csv::Writer::from_writer(writer);
    let mut written = 0;
    for event in view.iter() {
        csv.serialize(ExportRow::from(event))?;
        written += 1;
    }
    csv.flush()?;
    debug!(written, "Exported rows");
    Ok(written)
}
