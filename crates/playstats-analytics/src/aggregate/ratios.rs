//! Headline numbers and ratios: overview, skip rate, consistency, diversity.

use crate::filter::FilteredView;
use crate::model::MS_PER_MINUTE;
use playstats_common::ratio;
use serde::Serialize;
use std::collections::HashSet;

/// Totals and distinct counts of a view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Overview {
    /// Number of plays.
    pub total_plays: usize,
    /// Distinct track titles.
    pub distinct_tracks: usize,
    /// Distinct artists.
    pub distinct_artists: usize,
    /// Distinct album titles.
    pub distinct_albums: usize,
    /// Total minutes played.
    pub total_minutes: f64,
    /// Total hours played.
    pub total_hours: f64,
    /// Days with at least one play.
    pub active_days: usize,
    /// Plays per active day.
    pub average_plays_per_active_day: f64,
}

/// Skip flag counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SkipSummary {
    /// Plays flagged as skipped.
    pub skipped: usize,
    /// Plays flagged as not skipped.
    pub completed: usize,
    /// Plays without a skip flag.
    pub unknown: usize,
    /// `skipped / all plays`.
    pub skip_rate: f64,
}

/// Skipped plays over all plays, unknown flags included in the denominator.
/// Zero for an empty view.
pub fn skip_rate(view: &FilteredView<'_>) -> f64 {
    skip_summary(view).skip_rate
}

/// Counts of skipped, completed and unflagged plays.
pub fn skip_summary(view: &FilteredView<'_>) -> SkipSummary {
    let mut summary = SkipSummary::default();
    for event in view.iter() {
        match event.skipped {
            Some(true) => summary.skipped += 1,
            Some(false) => summary.completed += 1,
            None => summary.unknown += 1,
        }
    }
    summary.skip_rate = ratio(summary.skipped, view.len());
    summary
}

/// Distinct active days over the calendar days from the first to the last
/// active day, inclusive. Zero for an empty view.
pub fn consistency(view: &FilteredView<'_>) -> f64 {
    let dates: HashSet<_> = view.iter().map(|e| e.date()).collect();
    let (Some(first), Some(last)) = (dates.iter().min(), dates.iter().max()) else {
        return 0.0;
    };
    let span = (*last - *first).num_days() + 1;
    usize::try_from(span).map_or(0.0, |span| ratio(dates.len(), span))
}

/// Distinct artists over plays. Zero for an empty view.
pub fn diversity(view: &FilteredView<'_>) -> f64 {
    let artists: HashSet<&str> = view.iter().map(|e| e.artist_name.as_str()).collect();
    ratio(artists.len(), view.len())
}

/// Plays per day on which anything was played. Zero for an empty view.
pub fn average_plays_per_active_day(view: &FilteredView<'_>) -> f64 {
    let days: HashSet<_> = view.iter().map(|e| e.date()).collect();
    ratio(view.len(), days.len())
}

/// Totals and distinct counts.
///
/// Tracks are counted by title alone, so same-titled tracks by different
/// artists count once here; rankings key tracks by title and artist.
pub fn overview(view: &FilteredView<'_>) -> Overview {
    let tracks: HashSet<&str> = view.iter().map(|e| e.track_name.as_str()).collect();
    let artists: HashSet<&str> = view.iter().map(|e| e.artist_name.as_str()).collect();
    let albums: HashSet<&str> = view.iter().map(|e| e.album_name.as_str()).collect();
    let days: HashSet<_> = view.iter().map(|e| e.date()).collect();

    #[allow(clippy::cast_precision_loss)]
    let total_minutes = view.total_ms() as f64 / MS_PER_MINUTE;

    Overview {
        total_plays: view.len(),
        distinct_tracks: tracks.len(),
        distinct_artists: artists.len(),
        distinct_albums: albums.len(),
        total_minutes,
        total_hours: total_minutes / 60.0,
        active_days: days.len(),
        average_plays_per_active_day: ratio(view.len(), days.len()),
    }
}
