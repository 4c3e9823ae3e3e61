//! Type coercion of raw records.
//!
//! The first bad row aborts the whole pass; callers never see a partial list.

use crate::model::{NormalizedRow, RawRecord};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use playstats_common::DataFormatError;
use tracing::{debug, instrument};

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Coerces every record, or reports the first one that cannot be coerced.
#[instrument(skip_all, fields(rows = records.len(), tz = %time_zone))]
pub fn normalize(records: &[RawRecord], time_zone: Tz) -> Result<Vec<NormalizedRow>, DataFormatError> {
    let rows = records
        .iter()
        .map(|record| normalize_record(record, time_zone))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(rows = rows.len(), "Normalized records");
    Ok(rows)
}

/// Coerces one record.
pub fn normalize_record(record: &RawRecord, time_zone: Tz) -> Result<NormalizedRow, DataFormatError> {
    let row = record.row;
    let ts = required(record.ts.as_deref(), row, "ts")?;
    let ms = required(record.ms_played.as_deref(), row, "ms_played")?;

    Ok(NormalizedRow {
        timestamp: parse_timestamp(ts, time_zone).ok_or_else(|| {
            DataFormatError::InvalidTimestamp {
                row,
                value: ts.to_string(),
            }
        })?,
        ms_played: parse_ms_played(ms, row)?,
        track_name: record.track_name.clone(),
        artist_name: record.artist_name.clone(),
        album_name: record.album_name.clone(),
        platform: record.platform.clone(),
        skipped: record
            .skipped
            .as_deref()
            .map(|value| {
                parse_flag(value).ok_or_else(|| DataFormatError::InvalidBoolean {
                    row,
                    column: "skipped".to_string(),
                    value: value.to_string(),
                })
            })
            .transpose()?,
        track_uri: record.track_uri.clone(),
    })
}

fn required<'a>(value: Option<&'a str>, row: usize, column: &str) -> Result<&'a str, DataFormatError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| DataFormatError::MissingValue {
            row,
            column: column.to_string(),
        })
}

/// Parses a timestamp into the analysis time zone.
///
/// Offset-bearing input is converted; naive input is read as wall-clock time
/// in `time_zone`. Wall-clock times skipped by a DST transition do not parse;
/// ambiguous ones resolve to the earlier instant.
pub fn parse_timestamp(value: &str, time_zone: Tz) -> Option<DateTime<Tz>> {
    let value = value.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&time_zone));
    }

    // "2023-04-01 14:05:00Z" is not RFC 3339 but shows up in hand-made files
    if let Some(naive) = value
        .strip_suffix(['Z', 'z'])
        .and_then(parse_naive)
    {
        return Some(chrono::Utc.from_utc_datetime(&naive).with_timezone(&time_zone));
    }

    let naive = parse_naive(value)?;
    time_zone.from_local_datetime(&naive).earliest()
}

fn parse_naive(value: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Parses a play duration in whole milliseconds.
///
/// Integral floats (`1500.0`, `1.5e3`) are accepted; fractions are not.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn parse_ms_played(value: &str, row: usize) -> Result<u64, DataFormatError> {
    let value = value.trim();
    let negative = || DataFormatError::NegativeDuration {
        row,
        value: value.to_string(),
    };
    let invalid = || DataFormatError::InvalidDuration {
        row,
        value: value.to_string(),
    };

    if let Ok(ms) = value.parse::<i64>() {
        return u64::try_from(ms).map_err(|_| negative());
    }
    if let Ok(ms) = value.parse::<u64>() {
        return Ok(ms);
    }

    let ms = value.parse::<f64>().map_err(|_| invalid())?;
    if !ms.is_finite() {
        return Err(invalid());
    }
    if ms < 0.0 {
        return Err(negative());
    }
    if ms.fract() != 0.0 || ms >= u64::MAX as f64 {
        return Err(invalid());
    }
    Ok(ms as u64)
}

/// Parses a boolean flag: `true/false`, `1/0` or `yes/no`, any case.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
