//! Hour, weekday, time-of-day and calendar-day activity.

use super::{tally_by, Tally};
use crate::features::TimeOfDay;
use crate::filter::FilteredView;
use crate::model::PlayEvent;
use chrono::{NaiveDate, Weekday};
use playstats_common::{percentage, weekday_name, WEEKDAYS};
use serde::Serialize;
use std::collections::BTreeMap;

/// Activity in one hour of the day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourActivity {
    /// Hour, 0-23.
    pub hour: u32,
    /// Number of plays.
    pub plays: usize,
    /// Total minutes played.
    pub minutes: f64,
    /// Mean minutes per play; 0 when there are none.
    pub mean_minutes: f64,
}

/// Activity on one weekday.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayActivity {
    /// Weekday name.
    pub weekday: &'static str,
    /// Number of plays.
    pub plays: usize,
    /// Total minutes played.
    pub minutes: f64,
    /// Mean minutes per play; 0 when there are none.
    pub mean_minutes: f64,
}

/// Activity in one time-of-day bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeOfDayActivity {
    /// Bucket.
    pub bucket: TimeOfDay,
    /// Display label.
    pub label: &'static str,
    /// Number of plays.
    pub plays: usize,
    /// Total minutes played.
    pub minutes: f64,
    /// Percentage of all plays in view.
    pub share: f64,
}

/// Play counts per weekday (rows, Monday first) and hour (columns).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayHourMatrix {
    /// Row labels.
    pub weekdays: [&'static str; 7],
    /// `counts[day][hour]`.
    pub counts: [[usize; 24]; 7],
}

impl DayHourMatrix {
    /// Plays on `weekday` during `hour`.
    pub fn get(&self, weekday: Weekday, hour: u32) -> usize {
        self.counts[weekday.num_days_from_monday() as usize]
            .get(hour as usize)
            .copied()
            .unwrap_or(0)
    }

    /// Sum of every cell.
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }
}

/// Activity on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyActivity {
    /// Day in the analysis time zone.
    pub date: NaiveDate,
    /// Number of plays.
    pub plays: usize,
    /// Total minutes played.
    pub minutes: f64,
}

/// How many days had a given number of plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlaysPerDay {
    /// Plays on a day.
    pub plays: usize,
    /// Days with exactly that many plays.
    pub days: usize,
}

/// Weekday versus weekend play counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekendSplit {
    /// Plays Monday to Friday.
    pub weekday_plays: usize,
    /// Plays on Saturday and Sunday.
    pub weekend_plays: usize,
    /// Percentage of plays on weekdays.
    pub weekday_share: f64,
    /// Percentage of plays on weekends.
    pub weekend_share: f64,
}

/// Hourly profiles computed separately for weekdays and weekends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyProfiles {
    /// Monday to Friday, 24 entries.
    pub weekday: Vec<HourActivity>,
    /// Saturday and Sunday, 24 entries.
    pub weekend: Vec<HourActivity>,
}

/// The busiest values of a view. Ties go to the earliest value; everything is
/// `None` for an empty view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Peaks {
    /// Hour with the most plays.
    pub busiest_hour: Option<u32>,
    /// Weekday with the most plays.
    pub busiest_weekday: Option<&'static str>,
    /// Time-of-day bucket with the most plays.
    pub busiest_time_of_day: Option<TimeOfDay>,
    /// Busiest hour counting weekday plays only.
    pub busiest_weekday_hour: Option<u32>,
    /// Busiest hour counting weekend plays only.
    pub busiest_weekend_hour: Option<u32>,
    /// Day with the most plays.
    pub most_active_date: Option<NaiveDate>,
    /// Plays on that day.
    pub most_active_date_plays: usize,
}

fn hourly<'a, I>(events: I) -> Vec<HourActivity>
where
    I: IntoIterator<Item = &'a PlayEvent>,
{
    let mut hours = [Tally::default(); 24];
    for event in events {
        if let Some(slot) = hours.get_mut(event.hour() as usize) {
            slot.add(event);
        }
    }
    hours
        .iter()
        .zip(0u32..)
        .map(|(tally, hour)| HourActivity {
            hour,
            plays: tally.plays,
            minutes: tally.minutes(),
            mean_minutes: tally.mean_minutes(),
        })
        .collect()
}

/// Plays per hour; all 24 hours are present.
pub fn hourly_activity(view: &FilteredView<'_>) -> Vec<HourActivity> {
    hourly(view.iter())
}

/// Plays per weekday, Monday to Sunday; all seven are present.
pub fn weekday_activity(view: &FilteredView<'_>) -> Vec<WeekdayActivity> {
    let mut days = [Tally::default(); 7];
    for event in view.iter() {
        days[event.weekday().num_days_from_monday() as usize].add(event);
    }
    WEEKDAYS
        .iter()
        .zip(days)
        .map(|(day, tally)| WeekdayActivity {
            weekday: weekday_name(*day),
            plays: tally.plays,
            minutes: tally.minutes(),
            mean_minutes: tally.mean_minutes(),
        })
        .collect()
}

/// Plays per time-of-day bucket; all four are present.
pub fn time_of_day_distribution(view: &FilteredView<'_>) -> Vec<TimeOfDayActivity> {
    let groups = tally_by(view.iter(), PlayEvent::time_of_day);
    TimeOfDay::ALL
        .iter()
        .map(|bucket| {
            let tally = groups.get(bucket).copied().unwrap_or_default();
            TimeOfDayActivity {
                bucket: *bucket,
                label: bucket.label(),
                plays: tally.plays,
                minutes: tally.minutes(),
                share: percentage(tally.plays, view.len()),
            }
        })
        .collect()
}

/// Weekday by hour play-count matrix, zero-filled.
pub fn day_hour_matrix(view: &FilteredView<'_>) -> DayHourMatrix {
    let mut counts = [[0usize; 24]; 7];
    for event in view.iter() {
        let day = event.weekday().num_days_from_monday() as usize;
        if let Some(cell) = counts[day].get_mut(event.hour() as usize) {
            *cell += 1;
        }
    }
    DayHourMatrix {
        weekdays: WEEKDAYS.map(weekday_name),
        counts,
    }
}

/// Plays per calendar day, ascending by date. Days without plays are omitted.
pub fn daily_activity(view: &FilteredView<'_>) -> Vec<DailyActivity> {
    tally_by(view.iter(), PlayEvent::date)
        .into_iter()
        .map(|(date, tally)| DailyActivity {
            date,
            plays: tally.plays,
            minutes: tally.minutes(),
        })
        .collect()
}

/// For each observed daily play count, how many days had it. Ascending by play count.
pub fn plays_per_day_distribution(view: &FilteredView<'_>) -> Vec<PlaysPerDay> {
    let mut days_by_count: BTreeMap<usize, usize> = BTreeMap::new();
    for day in daily_activity(view) {
        *days_by_count.entry(day.plays).or_default() += 1;
    }
    days_by_count
        .into_iter()
        .map(|(plays, days)| PlaysPerDay { plays, days })
        .collect()
}

/// Weekday versus weekend counts.
pub fn weekend_split(view: &FilteredView<'_>) -> WeekendSplit {
    let weekend_plays = view.iter().filter(|e| e.is_weekend()).count();
    let weekday_plays = view.len() - weekend_plays;
    WeekendSplit {
        weekday_plays,
        weekend_plays,
        weekday_share: percentage(weekday_plays, view.len()),
        weekend_share: percentage(weekend_plays, view.len()),
    }
}

/// Hourly profiles of weekday and weekend plays.
pub fn weekday_vs_weekend_hourly(view: &FilteredView<'_>) -> HourlyProfiles {
    HourlyProfiles {
        weekday: hourly(view.iter().filter(|e| !e.is_weekend())),
        weekend: hourly(view.iter().filter(|e| e.is_weekend())),
    }
}

/// Position of the first maximum among nonzero counts.
fn first_peak<I: IntoIterator<Item = usize>>(counts: I) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (index, count) in counts.into_iter().enumerate() {
        if count > 0 && best.map_or(true, |(_, top)| count > top) {
            best = Some((index, count));
        }
    }
    best.map(|(index, _)| index)
}

/// Busiest hour, weekday, bucket and day of a view.
pub fn peaks(view: &FilteredView<'_>) -> Peaks {
    let hours = hourly_activity(view);
    let profiles = weekday_vs_weekend_hourly(view);
    let to_hour = |index: usize| u32::try_from(index).ok();

    let busiest_date = daily_activity(view)
        .into_iter()
        .fold(None::<DailyActivity>, |best, day| match best {
            Some(top) if top.plays >= day.plays => Some(top),
            _ => Some(day),
        });

    Peaks {
        busiest_hour: first_peak(hours.iter().map(|h| h.plays)).and_then(to_hour),
        busiest_weekday: first_peak(weekday_activity(view).iter().map(|d| d.plays))
            .map(|index| weekday_name(WEEKDAYS[index])),
        busiest_time_of_day: first_peak(time_of_day_distribution(view).iter().map(|b| b.plays))
            .map(|index| TimeOfDay::ALL[index]),
        busiest_weekday_hour: first_peak(profiles.weekday.iter().map(|h| h.plays))
            .and_then(to_hour),
        busiest_weekend_hour: first_peak(profiles.weekend.iter().map(|h| h.plays))
            .and_then(to_hour),
        most_active_date_plays: busiest_date.as_ref().map_or(0, |d| d.plays),
        most_active_date: busiest_date.map(|d| d.date),
    }
}
