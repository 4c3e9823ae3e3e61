//! Date range and platform selection over a dataset.

use crate::model::{Dataset, PlayEvent};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, instrument, warn};

/// Platform token that selects plays with no recorded platform.
pub const NO_PLATFORM: &str = "(none)";

/// A user's filter selection.
///
/// Dates are inclusive calendar days in the dataset's time zone. A `None`
/// entry in `platforms` selects plays with no recorded platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    /// First included day.
    pub start: NaiveDate,
    /// Last included day.
    pub end: NaiveDate,
    /// Allowed platform values.
    pub platforms: BTreeSet<Option<String>>,
}

impl FilterCriteria {
    /// Criteria with an explicit range and platform set.
    pub fn new<I>(start: NaiveDate, end: NaiveDate, platforms: I) -> Self
    where
        I: IntoIterator<Item = Option<String>>,
    {
        Self {
            start,
            end,
            platforms: platforms.into_iter().collect(),
        }
    }

    /// The default selection: the dataset's full date range and every platform in it.
    pub fn everything(dataset: &Dataset) -> Self {
        let (start, end) = date_bounds(dataset).unwrap_or((NaiveDate::MIN, NaiveDate::MAX));
        Self::new(start, end, distinct_platforms(dataset))
    }

    /// Starts from [`FilterCriteria::everything`] and replaces whatever is given.
    ///
    /// Platform names equal to [`NO_PLATFORM`] select plays without a platform.
    pub fn resolve(
        dataset: &Dataset,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        platforms: Option<&[String]>,
    ) -> Self {
        let mut criteria = Self::everything(dataset);
        if let Some(from) = from {
            criteria.start = from;
        }
        if let Some(to) = to {
            criteria.end = to;
        }
        if let Some(platforms) = platforms {
            criteria.platforms = platforms
                .iter()
                .map(|p| (p != NO_PLATFORM).then(|| p.clone()))
                .collect();
        }
        criteria
    }

    /// Replaces the date range.
    #[must_use]
    pub fn with_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Replaces the platform set.
    #[must_use]
    pub fn with_platforms<I>(mut self, platforms: I) -> Self
    where
        I: IntoIterator<Item = Option<String>>,
    {
        self.platforms = platforms.into_iter().collect();
        self
    }

    /// Whether one event passes the filter.
    pub fn matches(&self, event: &PlayEvent) -> bool {
        let date = event.date();
        self.start <= date && date <= self.end && self.platforms.contains(&event.platform)
    }
}

/// A borrowed subset of a dataset's events, in dataset order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    events: Vec<&'a PlayEvent>,
    criteria: Option<FilterCriteria>,
}

impl<'a> FilteredView<'a> {
    /// View over the given events with no recorded criteria.
    pub fn from_events<I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a PlayEvent>,
    {
        Self {
            events: events.into_iter().collect(),
            criteria: None,
        }
    }

    /// Number of events in view.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing is in view.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events in view.
    pub fn iter(&self) -> impl Iterator<Item = &'a PlayEvent> + '_ {
        self.events.iter().copied()
    }

    /// The criteria that produced this view, if it came from [`apply_filter`].
    pub const fn criteria(&self) -> Option<&FilterCriteria> {
        self.criteria.as_ref()
    }

    /// Total milliseconds played. Widened so that no accepted input can overflow.
    pub fn total_ms(&self) -> u128 {
        self.iter().map(|e| u128::from(e.ms_played)).sum()
    }
}

/// Selects the events matching `criteria`.
///
/// An empty platform set or `start > end` yields an empty view, not an error.
#[instrument(skip_all, fields(start = %criteria.start, end = %criteria.end, platforms = criteria.platforms.len()))]
pub fn apply_filter<'a>(dataset: &'a Dataset, criteria: &FilterCriteria) -> FilteredView<'a> {
    let events: Vec<&PlayEvent> = if criteria.start > criteria.end || criteria.platforms.is_empty() {
        Vec::new()
    } else {
        dataset.events().iter().filter(|e| criteria.matches(e)).collect()
    };

    if events.is_empty() {
        warn!(
            total = dataset.len(),
            "Filter selection matched no plays; results will be empty"
        );
    } else {
        debug!(selected = events.len(), total = dataset.len(), "Applied filter");
    }

    FilteredView {
        events,
        criteria: Some(criteria.clone()),
    }
}

/// Sorted distinct platform values; the absent platform sorts first.
pub fn distinct_platforms(dataset: &Dataset) -> Vec<Option<String>> {
    dataset
        .events()
        .iter()
        .map(|e| e.platform.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Earliest and latest calendar dates, or `None` for an empty dataset.
pub fn date_bounds(dataset: &Dataset) -> Option<(NaiveDate, NaiveDate)> {
    let mut dates = dataset.events().iter().map(PlayEvent::date);
    let first = dates.next()?;
    Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
}

/// What the presentation layer needs to build its filter widgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facets {
    /// Number of plays in the dataset.
    pub rows: usize,
    /// Distinct platform values.
    pub platforms: Vec<Option<String>>,
    /// Earliest date.
    pub first_date: Option<NaiveDate>,
    /// Latest date.
    pub last_date: Option<NaiveDate>,
    /// Time zone the dates are in.
    pub time_zone: String,
}

impl Facets {
    /// Collects facets from a dataset.
    pub fn of(dataset: &Dataset) -> Self {
        let bounds = date_bounds(dataset);
        Self {
            rows: dataset.len(),
            platforms: distinct_platforms(dataset),
            first_date: bounds.map(|b| b.0),
            last_date: bounds.map(|b| b.1),
            time_zone: dataset.time_zone().name().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playstats_common::test_utils::mock_timestamp;
    use chrono_tz::Tz;
    use proptest::prelude::*;

    fn event(day: u32, platform: Option<&str>) -> PlayEvent {
        PlayEvent {
            timestamp: mock_timestamp(2024, 5, day, 9, 0, 0).with_timezone(&Tz::UTC),
            ms_played: 60_000,
            track_name: format!("T{day}"),
            artist_name: "X".to_string(),
            album_name: "Y".to_string(),
            platform: platform.map(str::to_string),
            skipped: None,
            track_uri: None,
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    fn sample() -> Dataset {
        Dataset::new(
            vec![
                event(1, Some("ios")),
                event(2, Some("android")),
                event(3, None),
                event(4, Some("ios")),
            ],
            Tz::UTC,
        )
    }

    #[test]
    fn test_range_is_inclusive() {
        let dataset = sample();
        let criteria = FilterCriteria::everything(&dataset).with_range(date(2), date(3));
        let view = apply_filter(&dataset, &criteria);
        let days: Vec<_> = view.iter().map(PlayEvent::date).collect();
        assert_eq!(days, vec![date(2), date(3)]);
        assert_eq!(view.criteria(), Some(&criteria));
    }

    #[test]
    fn test_platform_selection() {
        let dataset = sample();
        let ios = FilterCriteria::everything(&dataset).with_platforms([Some("ios".to_string())]);
        assert_eq!(apply_filter(&dataset, &ios).len(), 2);

        let unrecorded = FilterCriteria::everything(&dataset).with_platforms([None]);
        assert_eq!(apply_filter(&dataset, &unrecorded).len(), 1);
    }

    #[test]
    fn test_empty_platform_set_selects_nothing() {
        let dataset = sample();
        let criteria = FilterCriteria::everything(&dataset).with_platforms(Vec::new());
        assert!(apply_filter(&dataset, &criteria).is_empty());
    }

    #[test]
    fn test_inverted_range_selects_nothing() {
        let dataset = sample();
        let criteria = FilterCriteria::everything(&dataset).with_range(date(4), date(1));
        assert!(apply_filter(&dataset, &criteria).is_empty());
    }

    #[test]
    fn test_facets() {
        let dataset = sample();
        assert_eq!(
            distinct_platforms(&dataset),
            vec![None, Some("android".to_string()), Some("ios".to_string())]
        );
        assert_eq!(date_bounds(&dataset), Some((date(1), date(4))));

        let facets = Facets::of(&dataset);
        assert_eq!(facets.rows, 4);
        assert_eq!(facets.time_zone, "UTC");

        let empty = Dataset::new(Vec::new(), Tz::UTC);
        assert_eq!(date_bounds(&empty), None);
        assert!(distinct_platforms(&empty).is_empty());
    }

    #[test]
    fn test_resolve_overrides_defaults() {
        let dataset = sample();
        let platforms = vec!["android".to_string(), NO_PLATFORM.to_string()];
        let criteria = FilterCriteria::resolve(&dataset, Some(date(2)), None, Some(&platforms));
        assert_eq!(criteria.start, date(2));
        assert_eq!(criteria.end, date(4));
        assert_eq!(
            criteria.platforms,
            BTreeSet::from([None, Some("android".to_string())])
        );
        assert_eq!(apply_filter(&dataset, &criteria).len(), 2);
    }

    #[test]
    fn test_everything_selects_all() {
        let dataset = sample();
        let view = apply_filter(&dataset, &FilterCriteria::everything(&dataset));
        assert_eq!(view.len(), dataset.len());
        assert_eq!(view.total_ms(), 240_000);
    }

    proptest! {
        #[test]
        fn prop_filter_matches_predicate(start in 1u32..=4, end in 1u32..=4, mask in 0u8..8) {
            let dataset = sample();
            let all = distinct_platforms(&dataset);
            let platforms: Vec<_> = all
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1u8 << *i) != 0)
                .map(|(_, p)| p.clone())
                .collect();
            let criteria = FilterCriteria::new(date(start), date(end), platforms);
            let view = apply_filter(&dataset, &criteria);

            let expected = dataset.events().iter().filter(|e| criteria.matches(e)).count();
            prop_assert_eq!(view.len(), expected);
            prop_assert!(view.iter().all(|e| criteria.matches(e)));
        }
    }
}
