//! Core data model: raw rows, normalized rows, play events and the dataset.

use crate::features::{DerivedFields, DurationBucket, TimeOfDay};
use chrono::{DateTime, Datelike, NaiveDate, Timelike, Weekday};
use chrono_tz::Tz;
use playstats_common::{month_name, weekday_name};

/// Milliseconds in one minute.
pub const MS_PER_MINUTE: f64 = 60_000.0;
/// Milliseconds in one second.
pub const MS_PER_SECOND: f64 = 1_000.0;

/// One input row as read from the file: every field still text, absent when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based data row number, used in error messages.
    pub row: usize,
    /// Timestamp text.
    pub ts: Option<String>,
    /// Play duration text, in milliseconds.
    pub ms_played: Option<String>,
    /// Track title.
    pub track_name: Option<String>,
    /// Artist name.
    pub artist_name: Option<String>,
    /// Album title.
    pub album_name: Option<String>,
    /// Client platform.
    pub platform: Option<String>,
    /// Skip flag text.
    pub skipped: Option<String>,
    /// Stable track identifier.
    pub track_uri: Option<String>,
}

/// A row after type coercion, before missing names are filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRow {
    /// When the play ended, in the analysis time zone.
    pub timestamp: DateTime<Tz>,
    /// Milliseconds played.
    pub ms_played: u64,
    /// Track title, if recorded.
    pub track_name: Option<String>,
    /// Artist name, if recorded.
    pub artist_name: Option<String>,
    /// Album title, if recorded.
    pub album_name: Option<String>,
    /// Client platform, if recorded.
    pub platform: Option<String>,
    /// Whether the play was skipped, if recorded.
    pub skipped: Option<bool>,
    /// Stable track identifier, if recorded.
    pub track_uri: Option<String>,
}

/// One logged play, ready for grouping.
///
/// Calendar and bucket values are computed from `timestamp` and `ms_played`
/// on every call; nothing derived is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayEvent {
    /// When the play ended, in the analysis time zone.
    pub timestamp: DateTime<Tz>,
    /// Milliseconds played.
    pub ms_played: u64,
    /// Track title or the unknown-track sentinel.
    pub track_name: String,
    /// Artist name or the unknown-artist sentinel.
    pub artist_name: String,
    /// Album title or the unknown-album sentinel.
    pub album_name: String,
    /// Client platform, if recorded.
    pub platform: Option<String>,
    /// Whether the play was skipped, if recorded.
    pub skipped: Option<bool>,
    /// Stable track identifier, if recorded.
    pub track_uri: Option<String>,
}

impl PlayEvent {
    /// Calendar day in the analysis time zone.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    /// Hour of day, 0-23.
    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    /// Day of week.
    pub fn weekday(&self) -> Weekday {
        self.timestamp.weekday()
    }

    /// Full English weekday name.
    pub fn weekday_name(&self) -> &'static str {
        weekday_name(self.weekday())
    }

    /// Full English month name.
    pub fn month_name(&self) -> &'static str {
        // month() is always 1..=12
        month_name(self.timestamp.month()).unwrap_or("January")
    }

    /// Calendar year.
    pub fn year(&self) -> i32 {
        self.timestamp.year()
    }

    /// Play duration in minutes.
    #[allow(clippy::cast_precision_loss)]
    pub fn minutes_played(&self) -> f64 {
        self.ms_played as f64 / MS_PER_MINUTE
    }

    /// Play duration in seconds.
    #[allow(clippy::cast_precision_loss)]
    pub fn seconds_played(&self) -> f64 {
        self.ms_played as f64 / MS_PER_SECOND
    }

    /// Time-of-day bucket of the play.
    pub fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::from_hour(self.hour())
    }

    /// Whether the play happened on a Saturday or Sunday.
    pub fn is_weekend(&self) -> bool {
        crate::features::is_weekend(self.weekday())
    }

    /// Duration bucket of the play.
    pub fn duration_bucket(&self) -> DurationBucket {
        DurationBucket::from_ms(self.ms_played)
    }

    /// Snapshot of every derived value.
    pub fn derived(&self) -> DerivedFields {
        DerivedFields::of(self)
    }
}

/// The normalized plays of one input file.
///
/// Built once per load and never modified; filters borrow from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    events: Vec<PlayEvent>,
    time_zone: Tz,
}

impl Dataset {
    /// Wraps normalized events. Input order is preserved.
    pub fn new(events: Vec<PlayEvent>, time_zone: Tz) -> Self {
        Self { events, time_zone }
    }

    /// All events in input order.
    pub fn events(&self) -> &[PlayEvent] {
        &self.events
    }

    /// Number of plays.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether there are no plays.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Time zone the calendar fields are computed in.
    pub const fn time_zone(&self) -> Tz {
        self.time_zone
    }

    /// Unfiltered view over every event.
    pub fn view(&self) -> crate::filter::FilteredView<'_> {
        crate::filter::FilteredView::from_events(self.events.iter())
    }
}
