//! Bucketed and derived columns computed from a play event.

use crate::model::PlayEvent;
use chrono::{NaiveDate, Weekday};
use serde::Serialize;
use std::ops::Range;

/// Part of the day a play falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    /// Hours 0-5.
    Night,
    /// Hours 6-11.
    Morning,
    /// Hours 12-17.
    Afternoon,
    /// Hours 18-23.
    Evening,
}

impl TimeOfDay {
    /// Every bucket, in chronological order.
    pub const ALL: [Self; 4] = [Self::Night, Self::Morning, Self::Afternoon, Self::Evening];

    /// Classifies an hour of day. Hours past 23 never come out of a timestamp
    /// and land in the last bucket.
    pub const fn from_hour(hour: u32) -> Self {
        match hour {
            0..=5 => Self::Night,
            6..=11 => Self::Morning,
            12..=17 => Self::Afternoon,
            _ => Self::Evening,
        }
    }

    /// The half-open hour range this bucket covers.
    pub const fn hours(self) -> Range<u32> {
        match self {
            Self::Night => 0..6,
            Self::Morning => 6..12,
            Self::Afternoon => 12..18,
            Self::Evening => 18..24,
        }
    }

    /// Display label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Night => "Night (0-6)",
            Self::Morning => "Morning (6-12)",
            Self::Afternoon => "Afternoon (12-18)",
            Self::Evening => "Evening (18-24)",
        }
    }
}

/// How long a play lasted.
///
/// Upper bounds are inclusive: exactly 30 seconds is very short, exactly two
/// minutes is short, exactly five minutes is medium. A zero-length play is
/// very short.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationBucket {
    /// Up to 30 seconds.
    VeryShort,
    /// Over 30 seconds, up to 2 minutes.
    Short,
    /// Over 2 minutes, up to 5 minutes.
    Medium,
    /// Over 5 minutes.
    Long,
}

impl DurationBucket {
    /// Every bucket, shortest first.
    pub const ALL: [Self; 4] = [Self::VeryShort, Self::Short, Self::Medium, Self::Long];

    /// Classifies a duration in milliseconds.
    pub const fn from_ms(ms: u64) -> Self {
        match ms {
            0..=30_000 => Self::VeryShort,
            30_001..=120_000 => Self::Short,
            120_001..=300_000 => Self::Medium,
            _ => Self::Long,
        }
    }

    /// Classifies a duration in minutes. Negative or NaN input counts as very short.
    pub fn from_minutes(minutes: f64) -> Self {
        if minutes.is_nan() || minutes <= 0.5 {
            Self::VeryShort
        } else if minutes <= 2.0 {
            Self::Short
        } else if minutes <= 5.0 {
            Self::Medium
        } else {
            Self::Long
        }
    }

    /// Display label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::VeryShort => "Very short (<30s)",
            Self::Short => "Short (30s-2m)",
            Self::Medium => "Medium (2-5m)",
            Self::Long => "Long (>5m)",
        }
    }
}

/// Saturday or Sunday.
pub const fn is_weekend(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Sat | Weekday::Sun)
}

/// Every derived value of one play, for export and inspection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedFields {
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

impl DerivedFields {
    /// Computes the snapshot from the event's source fields.
    pub fn of(event: &PlayEvent) -> Self {
        Self {
            date: event.date(),
            hour: event.hour(),
            weekday: event.weekday_name(),
            month: event.month_name(),
            year: event.year(),
            minutes_played: event.minutes_played(),
            seconds_played: event.seconds_played(),
            time_of_day: event.time_of_day(),
            is_weekend: event.is_weekend(),
            duration_bucket: event.duration_bucket(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_time_of_day_boundaries() {
        assert_eq!(TimeOfDay::from_hour(0), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(5), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(6), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(12), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(18), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(23), TimeOfDay::Evening);
    }

    #[test]
    fn test_time_of_day_partitions_the_day() {
        for hour in 0..24 {
            let owners: Vec<_> = TimeOfDay::ALL
                .iter()
                .filter(|bucket| bucket.hours().contains(&hour))
                .collect();
            assert_eq!(owners.len(), 1, "hour {hour} owned by {owners:?}");
            assert_eq!(*owners[0], TimeOfDay::from_hour(hour));
        }
    }

    #[test]
    fn test_duration_boundaries() {
        assert_eq!(DurationBucket::from_ms(0), DurationBucket::VeryShort);
        assert_eq!(DurationBucket::from_ms(30_000), DurationBucket::VeryShort);
        assert_eq!(DurationBucket::from_ms(30_001), DurationBucket::Short);
        assert_eq!(DurationBucket::from_ms(120_000), DurationBucket::Short);
        assert_eq!(DurationBucket::from_ms(120_001), DurationBucket::Medium);
        assert_eq!(DurationBucket::from_ms(180_000), DurationBucket::Medium);
        assert_eq!(DurationBucket::from_ms(300_000), DurationBucket::Medium);
        assert_eq!(DurationBucket::from_ms(300_001), DurationBucket::Long);
    }

    #[test]
    fn test_weekend_flag() {
        let weekend: Vec<_> = playstats_common::WEEKDAYS
            .iter()
            .filter(|d| is_weekend(**d))
            .collect();
        assert_eq!(weekend, vec![&Weekday::Sat, &Weekday::Sun]);
    }

    #[test]
    fn test_labels_are_distinct() {
        let labels: std::collections::HashSet<_> =
            TimeOfDay::ALL.iter().map(|b| b.label()).collect();
        assert_eq!(labels.len(), 4);
        let labels: std::collections::HashSet<_> =
            DurationBucket::ALL.iter().map(|b| b.label()).collect();
        assert_eq!(labels.len(), 4);
    }

    #[test]
    fn test_serialized_names() {
        assert_eq!(
            serde_json::to_string(&DurationBucket::VeryShort).unwrap(),
            "\"very_short\""
        );
        assert_eq!(serde_json::to_string(&TimeOfDay::Night).unwrap(), "\"night\"");
    }

    proptest! {
        #[test]
        fn prop_ms_and_minutes_classification_agree(ms in 0u64..20_000_000) {
            #[allow(clippy::cast_precision_loss)]
            let minutes = ms as f64 / 60_000.0;
            prop_assert_eq!(DurationBucket::from_ms(ms), DurationBucket::from_minutes(minutes));
        }

        #[test]
        fn prop_buckets_are_monotonic(a in 0u64..20_000_000, b in 0u64..20_000_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(DurationBucket::from_ms(lo) <= DurationBucket::from_ms(hi));
        }

        #[test]
        fn prop_hour_bucket_contains_hour(hour in 0u32..24) {
            let bucket = TimeOfDay::from_hour(hour);
            prop_assert!(bucket.hours().contains(&hour));
        }
    }
}
