//! Shared utility functions.

use chrono::Weekday;
use unicode_segmentation::UnicodeSegmentation;

/// Weekdays in canonical display order, Monday first.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Full English name of a weekday ("Monday", ...).
pub const fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Full English name of a month, `month` being 1-based. Out of range yields `None`.
pub fn month_name(month: u32) -> Option<&'static str> {
    let index = usize::try_from(month.checked_sub(1)?).ok()?;
    MONTH_NAMES.get(index).copied()
}

/// Trims `value`, returning `None` when nothing is left.
pub fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim().trim_start_matches('\u{feff}').trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// `numerator / denominator`, or 0 when the denominator is 0.
#[allow(clippy::cast_precision_loss)]
pub fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Share of `part` in `whole` as a percentage, 0 when `whole` is 0.
pub fn percentage(part: usize, whole: usize) -> f64 {
    ratio(part, whole) * 100.0
}

/// Truncates to at most `max_graphemes` user-perceived characters, marking the cut with "...".
pub fn truncate_display(input: &str, max_graphemes: usize) -> String {
    let count = input.graphemes(true).count();
    if count <= max_graphemes {
        return input.to_string();
    }
    if max_graphemes < 3 {
        return input.graphemes(true).take(max_graphemes).collect();
    }
    let mut out: String = input.graphemes(true).take(max_graphemes - 3).collect();
    out.push_str("...");
    out
}

/// Renders minutes as "1h 05m" or "42m".
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_minutes(minutes: f64) -> String {
    let total = minutes.max(0.0).round() as u64;
    let (hours, mins) = (total / 60, total % 60);
    if hours > 0 {
        format!("{hours}h {mins:02}m")
    } else {
        format!("{mins}m")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_names_in_order() {
        let names: Vec<_> = WEEKDAYS.iter().map(|d| weekday_name(*d)).collect();
        assert_eq!(
            names,
            vec!["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"]
        );
    }

    #[test]
    fn test_month_name_bounds() {
        assert_eq!(month_name(1), Some("January"));
        assert_eq!(month_name(12), Some("December"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty("  Daft Punk "), Some("Daft Punk".to_string()));
        assert_eq!(non_empty("   "), None);
        assert_eq!(non_empty(""), None);
        assert_eq!(non_empty("\u{feff}ts"), Some("ts".to_string()));
    }

    #[test]
    fn test_ratio_and_percentage() {
        assert_eq!(ratio(1, 0), 0.0);
        assert_eq!(ratio(1, 4), 0.25);
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(3, 4), 75.0);
    }

    #[test]
    fn test_truncate_display() {
        assert_eq!(truncate_display("Short", 20), "Short");
        assert_eq!(
            truncate_display("This is a very long string that should be truncated", 20),
            "This is a very lo..."
        );
        assert_eq!(truncate_display("Sigur Rós – Hoppípolla", 9), "Sigur ...");
        assert_eq!(truncate_display("abcdef", 2), "ab");
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(42.2), "42m");
        assert_eq!(format_minutes(65.0), "1h 05m");
        assert_eq!(format_minutes(-3.0), "0m");
    }
}
