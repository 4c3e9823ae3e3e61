//! The dashboard report: every aggregate of one filtered view.

use crate::aggregate::{
    consistency, daily_activity, day_hour_matrix, diversity, duration_bucket_distribution,
    duration_histogram, duration_summary, hourly_activity, longest_sessions, overview, peaks,
    platform_distribution, plays_per_day_distribution, skip_summary, time_of_day_distribution,
    top_albums, top_artists, top_tracks, weekday_activity, weekday_vs_weekend_hourly,
    weekend_split, AlbumRank, ArtistRank, DailyActivity, DayHourMatrix, DurationBucketShare,
    DurationSummary, HistogramBin, HourActivity, HourlyProfiles, LongestSession, Overview, Peaks,
    PlatformShare, PlaysPerDay, RankBy, SkipSummary, TimeOfDayActivity, TrackRank,
    WeekdayActivity, WeekendSplit,
};
use crate::filter::{FilterCriteria, FilteredView};
use playstats_config::{AnalysisConfig, DEFAULT_SHORT_TOP_N, DEFAULT_TOP_N};
use serde::Serialize;
use tracing::{debug, instrument};

/// Table sizes and histogram shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportOptions {
    /// Rows in the artists-by-plays table.
    pub top_artists: usize,
    /// Rows in the artists-by-minutes table.
    pub top_artists_by_minutes: usize,
    /// Rows in each track table.
    pub top_tracks: usize,
    /// Rows in each album table.
    pub top_albums: usize,
    /// Rows in the longest-plays table.
    pub longest_sessions: usize,
    /// Upper edge of the duration histogram, in minutes.
    pub histogram_max_minutes: f64,
    /// Number of histogram bins.
    pub histogram_bins: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
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

impl From<&AnalysisConfig> for ReportOptions {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            top_artists: config.top_artists,
            top_artists_by_minutes: config.top_artists_by_minutes,
            top_tracks: config.top_tracks,
            top_albums: config.top_albums,
            longest_sessions: config.longest_sessions,
            histogram_max_minutes: config.histogram_max_minutes,
            histogram_bins: config.histogram_bins,
        }
    }
}

/// Non-fatal conditions worth showing next to the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportWarning {
    /// The filter selection matched no plays.
    EmptyResult {
        /// Why nothing matched, as far as can be told.
        reason: String,
    },
}

impl std::fmt::Display for ReportWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyResult { reason } => write!(f, "no plays match the selection: {reason}"),
        }
    }
}

/// Rankings section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rankings {
    /// Artists by play count.
    pub artists_by_plays: Vec<ArtistRank>,
    /// Artists by minutes.
    pub artists_by_minutes: Vec<ArtistRank>,
    /// Tracks by play count.
    pub tracks_by_plays: Vec<TrackRank>,
    /// Tracks by minutes.
    pub tracks_by_minutes: Vec<TrackRank>,
    /// Albums by play count.
    pub albums_by_plays: Vec<AlbumRank>,
    /// Platforms by play count.
    pub platforms: Vec<PlatformShare>,
}

/// Time-pattern section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimePatterns {
    /// Per hour, 24 entries.
    pub hourly: Vec<HourActivity>,
    /// Per weekday, Monday first.
    pub weekdays: Vec<WeekdayActivity>,
    /// Per time-of-day bucket.
    pub time_of_day: Vec<TimeOfDayActivity>,
    /// Weekday by hour counts.
    pub day_hour: DayHourMatrix,
    /// Weekday versus weekend counts.
    pub weekend_split: WeekendSplit,
    /// Weekday and weekend hourly profiles.
    pub hourly_profiles: HourlyProfiles,
}

/// Duration section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    /// Mean, median and totals.
    pub summary: DurationSummary,
    /// Per duration bucket.
    pub buckets: Vec<DurationBucketShare>,
    /// Equal-width histogram.
    pub histogram: Vec<HistogramBin>,
    /// Longest single plays.
    pub longest: Vec<LongestSession>,
}

/// Habit section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Habits {
    /// Skip counts and rate.
    pub skips: SkipSummary,
    /// Active days over spanned days.
    pub consistency: f64,
    /// Distinct artists over plays.
    pub diversity: f64,
    /// Plays per calendar day.
    pub daily: Vec<DailyActivity>,
    /// Days per daily play count.
    pub plays_per_day: Vec<PlaysPerDay>,
}

/// Everything the presentation layer shows for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    /// Selection that produced the view, when known.
    pub criteria: Option<FilterCriteria>,
    /// Options used.
    pub options: ReportOptions,
    /// Non-fatal conditions.
    pub warnings: Vec<ReportWarning>,
    /// Totals.
    pub overview: Overview,
    /// Busiest values.
    pub peaks: Peaks,
    /// Top-N tables.
    pub rankings: Rankings,
    /// Time patterns.
    pub time: TimePatterns,
    /// Durations.
    pub durations: DurationStats,
    /// Habits.
    pub habits: Habits,
}

impl DashboardReport {
    /// Whether the report was built from an empty view.
    pub fn is_empty(&self) -> bool {
        self.overview.total_plays == 0
    }
}

fn empty_reason(criteria: Option<&FilterCriteria>) -> String {
    match criteria {
        Some(c) if c.platforms.is_empty() => "no platforms are selected".to_string(),
        Some(c) if c.start > c.end => format!("start date {} is after end date {}", c.start, c.end),
        Some(c) => format!("no plays between {} and {} on the selected platforms", c.start, c.end),
        None => "the dataset has no plays".to_string(),
    }
}

/// Runs every aggregator over `view`.
#[instrument(skip_all, fields(plays = view.len()))]
pub fn build_report(view: &FilteredView<'_>, options: &ReportOptions) -> DashboardReport {
    let mut warnings = Vec::new();
    if view.is_empty() {
        warnings.push(ReportWarning::EmptyResult {
            reason: empty_reason(view.criteria()),
        });
    }

    let report = DashboardReport {
        criteria: view.criteria().cloned(),
        options: options.clone(),
        warnings,
        overview: overview(view),
        peaks: peaks(view),
        rankings: Rankings {
            artists_by_plays: top_artists(view, RankBy::Plays, options.top_artists),
            artists_by_minutes: top_artists(view, RankBy::Minutes, options.top_artists_by_minutes),
            tracks_by_plays: top_tracks(view, RankBy::Plays, options.top_tracks),
            tracks_by_minutes: top_tracks(view, RankBy::Minutes, options.top_tracks),
            albums_by_plays: top_albums(view, RankBy::Plays, options.top_albums),
            platforms: platform_distribution(view),
        },
        time: TimePatterns {
            hourly: hourly_activity(view),
            weekdays: weekday_activity(view),
            time_of_day: time_of_day_distribution(view),
            day_hour: day_hour_matrix(view),
            weekend_split: weekend_split(view),
            hourly_profiles: weekday_vs_weekend_hourly(view),
        },
        durations: DurationStats {
            summary: duration_summary(view),
            buckets: duration_bucket_distribution(view),
            histogram: duration_histogram(view, options.histogram_max_minutes, options.histogram_bins),
            longest: longest_sessions(view, options.longest_sessions),
        },
        habits: Habits {
            skips: skip_summary(view),
            consistency: consistency(view),
            diversity: diversity(view),
            daily: daily_activity(view),
            plays_per_day: plays_per_day_distribution(view),
        },
    };

    debug!(warnings = report.warnings.len(), "Built dashboard report");
    report
}
