//! Listening-duration statistics.

use super::tally_by;
use crate::features::DurationBucket;
use crate::filter::FilteredView;
use crate::model::{PlayEvent, MS_PER_MINUTE};
use chrono::DateTime;
use chrono_tz::Tz;
use playstats_common::percentage;
use serde::Serialize;

/// Mean, median and total play duration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DurationSummary {
    /// Mean minutes per play.
    pub mean_minutes: f64,
    /// Median minutes per play.
    pub median_minutes: f64,
    /// Total minutes.
    pub total_minutes: f64,
    /// Total hours.
    pub total_hours: f64,
}

/// Plays in one duration bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationBucketShare {
    /// Bucket.
    pub bucket: DurationBucket,
    /// Display label.
    pub label: &'static str,
    /// Number of plays.
    pub plays: usize,
    /// Percentage of all plays in view.
    pub share: f64,
}

/// One histogram bin, `[start, end)`; the last bin also includes `end`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    /// Lower edge in minutes.
    pub start_minutes: f64,
    /// Upper edge in minutes.
    pub end_minutes: f64,
    /// Plays in the bin.
    pub plays: usize,
}

/// One of the longest plays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongestSession {
    /// When the play ended.
    pub timestamp: DateTime<Tz>,
    /// Track title.
    pub track: String,
    /// Artist name.
    pub artist: String,
    /// Duration in minutes.
    pub minutes: f64,
}

#[allow(clippy::cast_precision_loss)]
fn minutes(ms: impl Into<u128>) -> f64 {
    let ms: u128 = ms.into();
    ms as f64 / MS_PER_MINUTE
}

/// Mean, median and total duration; all zero for an empty view.
pub fn duration_summary(view: &FilteredView<'_>) -> DurationSummary {
    let mut durations: Vec<u64> = view.iter().map(|e| e.ms_played).collect();
    if durations.is_empty() {
        return DurationSummary::default();
    }
    durations.sort_unstable();

    let total: u128 = durations.iter().copied().map(u128::from).sum();
    let mid = durations.len() / 2;
    let median = if durations.len() % 2 == 0 {
        (minutes(durations[mid - 1]) + minutes(durations[mid])) / 2.0
    } else {
        minutes(durations[mid])
    };
    #[allow(clippy::cast_precision_loss)]
    let mean = minutes(total) / durations.len() as f64;

    DurationSummary {
        mean_minutes: mean,
        median_minutes: median,
        total_minutes: minutes(total),
        total_hours: minutes(total) / 60.0,
    }
}

/// Plays per duration bucket; all four are present.
pub fn duration_bucket_distribution(view: &FilteredView<'_>) -> Vec<DurationBucketShare> {
    let groups = tally_by(view.iter(), PlayEvent::duration_bucket);
    DurationBucket::ALL
        .iter()
        .map(|bucket| {
            let plays = groups.get(bucket).map_or(0, |t| t.plays);
            DurationBucketShare {
                bucket: *bucket,
                label: bucket.label(),
                plays,
                share: percentage(plays, view.len()),
            }
        })
        .collect()
}

/// Equal-width histogram of play durations over `[0, max_minutes]`.
///
/// Plays longer than `max_minutes` are left out. Returns no bins when `bins`
/// is zero or `max_minutes` is not a positive number.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn duration_histogram(view: &FilteredView<'_>, max_minutes: f64, bins: usize) -> Vec<HistogramBin> {
    if bins == 0 || !max_minutes.is_finite() || max_minutes <= 0.0 {
        return Vec::new();
    }

    let width = max_minutes / bins as f64;
    let mut counts = vec![0usize; bins];
    for event in view.iter() {
        let value = event.minutes_played();
        if value > max_minutes {
            continue;
        }
        let index = ((value / width) as usize).min(bins - 1);
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, plays)| HistogramBin {
            start_minutes: width * i as f64,
            end_minutes: width * (i + 1) as f64,
            plays,
        })
        .collect()
}

/// The `limit` longest plays, longest first. Equal durations list the earlier play first.
pub fn longest_sessions(view: &FilteredView<'_>, limit: usize) -> Vec<LongestSession> {
    let mut events: Vec<&PlayEvent> = view.iter().collect();
    events.sort_by(|a, b| {
        b.ms_played
            .cmp(&a.ms_played)
            .then_with(|| a.timestamp.cmp(&b.timestamp))
    });
    events
        .into_iter()
        .take(limit)
        .map(|e| LongestSession {
            timestamp: e.timestamp,
            track: e.track_name.clone(),
            artist: e.artist_name.clone(),
            minutes: e.minutes_played(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use playstats_common::test_utils::mock_timestamp;
    use playstats_common::test_utils::assert_approx_eq;

    fn lasting(ms: u64, minute: u32) -> PlayEvent {
        PlayEvent {
            timestamp: mock_timestamp(2024, 2, 1, 12, minute, 0).with_timezone(&Tz::UTC),
            ms_played: ms,
            track_name: format!("t{minute}"),
            artist_name: "a".to_string(),
            album_name: "b".to_string(),
            platform: None,
            skipped: None,
            track_uri: None,
        }
    }

    #[test]
    fn test_summary() {
        let events = [lasting(60_000, 0), lasting(120_000, 1), lasting(600_000, 2)];
        let summary = duration_summary(&FilteredView::from_events(&events));
        assert_approx_eq(summary.mean_minutes, 13.0 / 3.0, 1e-9);
        assert_eq!(summary.median_minutes, 2.0);
        assert_eq!(summary.total_minutes, 13.0);

        let even = [lasting(60_000, 0), lasting(180_000, 1)];
        assert_eq!(duration_summary(&FilteredView::from_events(&even)).median_minutes, 2.0);

        let empty = FilteredView::from_events(std::iter::empty());
        assert_eq!(duration_summary(&empty), DurationSummary::default());
    }

    #[test]
    fn test_bucket_distribution() {
        let events = [lasting(0, 0), lasting(30_000, 1), lasting(180_000, 2), lasting(400_000, 3)];
        let buckets = duration_bucket_distribution(&FilteredView::from_events(&events));
        let plays: Vec<_> = buckets.iter().map(|b| b.plays).collect();
        assert_eq!(plays, [2, 0, 1, 1]);
        assert_eq!(buckets[0].share, 50.0);
    }

    #[test]
    fn test_histogram() {
        let events = [
            lasting(0, 0),
            lasting(59_999, 1),
            lasting(60_000, 2),
            lasting(600_000, 3),
            lasting(600_001, 4),
        ];
        let view = FilteredView::from_events(&events);
        let bins = duration_histogram(&view, 10.0, 10);
        assert_eq!(bins.len(), 10);
        assert_eq!(bins[0].plays, 2);
        assert_eq!(bins[1].plays, 1);
        // exactly max lands in the last bin; over max is dropped
        assert_eq!(bins[9].plays, 1);
        assert_eq!(bins.iter().map(|b| b.plays).sum::<usize>(), 4);
        assert_eq!(bins[9].end_minutes, 10.0);

        assert!(duration_histogram(&view, 10.0, 0).is_empty());
        assert!(duration_histogram(&view, 0.0, 5).is_empty());
    }

    #[test]
    fn test_longest_sessions() {
        let events = [lasting(1_000, 5), lasting(9_000, 4), lasting(9_000, 2), lasting(5_000, 1)];
        let longest = longest_sessions(&FilteredView::from_events(&events), 3);
        let tracks: Vec<_> = longest.iter().map(|s| s.track.as_str()).collect();
        assert_eq!(tracks, ["t2", "t4", "t1"]);
        assert_eq!(longest[0].minutes, 0.15);
    }
}
