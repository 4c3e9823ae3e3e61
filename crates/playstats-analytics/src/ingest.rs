//! Reading CSV and JSON history files into raw text records.
//!
//! Nothing is interpreted here beyond locating columns: every value stays a
//! string (or absent) until the normalizer sees it.

use crate::model::RawRecord;
use playstats_common::{non_empty, DataFormatError};
use playstats_config::InputFormat;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, instrument};

/// A logical input column and the header names it may appear under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// Play timestamp.
    Timestamp,
    /// Milliseconds played.
    MsPlayed,
    /// Track title.
    TrackName,
    /// Artist name.
    ArtistName,
    /// Album title.
    AlbumName,
    /// Client platform.
    Platform,
    /// Skip flag.
    Skipped,
    /// Stable track identifier.
    TrackUri,
}

impl Column {
    /// Every column, required ones first.
    pub const ALL: [Self; 8] = [
        Self::Timestamp,
        Self::MsPlayed,
        Self::TrackName,
        Self::ArtistName,
        Self::AlbumName,
        Self::Platform,
        Self::Skipped,
        Self::TrackUri,
    ];

    /// Canonical name used in messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Timestamp => "ts",
            Self::MsPlayed => "ms_played",
            Self::TrackName => "track_name",
            Self::ArtistName => "artist_name",
            Self::AlbumName => "album_name",
            Self::Platform => "platform",
            Self::Skipped => "skipped",
            Self::TrackUri => "spotify_track_uri",
        }
    }

    /// Accepted header names, highest priority first.
    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Timestamp => &["ts", "endTime"],
            Self::MsPlayed => &["ms_played", "msPlayed"],
            Self::TrackName => &["track_name", "master_metadata_track_name", "trackName"],
            Self::ArtistName => &[
                "artist_name",
                "master_metadata_album_artist_name",
                "artistName",
            ],
            Self::AlbumName => &[
                "album_name",
                "master_metadata_album_album_name",
                "albumName",
            ],
            Self::Platform => &["platform"],
            Self::Skipped => &["skipped"],
            Self::TrackUri => &["spotify_track_uri", "track_uri"],
        }
    }

    /// Whether a file without this column is rejected.
    pub const fn is_required(self) -> bool {
        matches!(self, Self::Timestamp | Self::MsPlayed)
    }

    fn assign(self, record: &mut RawRecord, value: Option<String>) {
        let slot = match self {
            Self::Timestamp => &mut record.ts,
            Self::MsPlayed => &mut record.ms_played,
            Self::TrackName => &mut record.track_name,
            Self::ArtistName => &mut record.artist_name,
            Self::AlbumName => &mut record.album_name,
            Self::Platform => &mut record.platform,
            Self::Skipped => &mut record.skipped,
            Self::TrackUri => &mut record.track_uri,
        };
        *slot = value;
    }
}

/// Picks a concrete format: explicit choice, then file extension, then content sniffing.
pub fn resolve_format(format: InputFormat, path: Option<&Path>, bytes: &[u8]) -> InputFormat {
    match format {
        InputFormat::Csv | InputFormat::Json => format,
        InputFormat::Auto => {
            let by_extension = path
                .and_then(Path::extension)
                .and_then(|ext| ext.to_str())
                .map(str::to_ascii_lowercase);
            match by_extension.as_deref() {
                Some("json") => InputFormat::Json,
                Some("csv") => InputFormat::Csv,
                _ => sniff(bytes),
            }
        }
    }
}

fn sniff(bytes: &[u8]) -> InputFormat {
    let body = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match body.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'[') => InputFormat::Json,
        _ => InputFormat::Csv,
    }
}

/// Reads records in the given concrete format. `Auto` is sniffed from content.
pub fn read_records(bytes: &[u8], format: InputFormat) -> Result<Vec<RawRecord>, DataFormatError> {
    match resolve_format(format, None, bytes) {
        InputFormat::Json => read_json(bytes),
        _ => read_csv(bytes),
    }
}

/// Reads a CSV file with a header row.
#[instrument(skip(bytes), fields(bytes = bytes.len()))]
pub fn read_csv(bytes: &[u8]) -> Result<Vec<RawRecord>, DataFormatError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| non_empty(h).unwrap_or_default())
        .collect();

    let mut positions = Vec::with_capacity(Column::ALL.len());
    for column in Column::ALL {
        let index = column
            .aliases()
            .iter()
            .find_map(|alias| headers.iter().position(|h| h == alias));
        match index {
            Some(index) => positions.push((column, index)),
            None if column.is_required() => {
                return Err(DataFormatError::MissingColumn {
                    column: column.name().to_string(),
                })
            }
            None => {}
        }
    }
    debug!(columns = positions.len(), "Resolved CSV columns");

    let mut records = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let row = result?;
        let mut record = RawRecord {
            row: index + 1,
            ..RawRecord::default()
        };
        for (column, position) in &positions {
            column.assign(&mut record, row.get(*position).and_then(non_empty));
        }
        records.push(record);
    }

    Ok(records)
}

/// Reads a JSON array of play objects, as found in streaming-history exports.
#[instrument(skip(bytes), fields(bytes = bytes.len()))]
pub fn read_json(bytes: &[u8]) -> Result<Vec<RawRecord>, DataFormatError> {
    let body = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let items: Vec<Value> =
        serde_json::from_slice(body).map_err(|e| DataFormatError::Malformed {
            row: None,
            message: e.to_string(),
        })?;

    let mut seen: HashSet<Column> = HashSet::new();
    let mut records = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let row = index + 1;
        let Value::Object(fields) = item else {
            return Err(DataFormatError::Malformed {
                row: Some(row),
                message: "expected a JSON object".to_string(),
            });
        };

        let mut record = RawRecord {
            row,
            ..RawRecord::default()
        };
        for column in Column::ALL {
            let Some(value) = column.aliases().iter().find_map(|alias| fields.get(*alias)) else {
                continue;
            };
            seen.insert(column);
            column.assign(&mut record, scalar_text(value, row, column)?);
        }
        records.push(record);
    }

    if !records.is_empty() {
        if let Some(missing) = Column::ALL
            .into_iter()
            .find(|c| c.is_required() && !seen.contains(c))
        {
            return Err(DataFormatError::MissingColumn {
                column: missing.name().to_string(),
            });
        }
    }

    Ok(records)
}

fn scalar_text(value: &Value, row: usize, column: Column) -> Result<Option<String>, DataFormatError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(non_empty(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Array(_) | Value::Object(_) => Err(DataFormatError::Malformed {
            row: Some(row),
            message: format!("column '{}' holds a nested value", column.name()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_reads_and_blanks_become_absent() {
        let input = b"ts,ms_played,track_name,artist_name,album_name\n\
                      2024-01-01T10:00:00Z,1000,Song,,Album\n";
        let records = read_csv(input).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.row, 1);
        assert_eq!(record.ts.as_deref(), Some("2024-01-01T10:00:00Z"));
        assert_eq!(record.track_name.as_deref(), Some("Song"));
        assert_eq!(record.artist_name, None);
        assert_eq!(record.platform, None);
    }

    #[test]
    fn test_csv_missing_required_column() {
        let err = read_csv(b"ts,track_name\n2024-01-01,Song\n").unwrap_err();
        assert_eq!(
            err,
            DataFormatError::MissingColumn {
                column: "ms_played".to_string()
            }
        );
    }

    #[test]
    fn test_csv_bom_and_aliases() {
        let input = "\u{feff}endTime,msPlayed,trackName,artistName\n2024-01-01 10:00,500,T,A\n";
        let records = read_csv(input.as_bytes()).unwrap();
        assert_eq!(records[0].ts.as_deref(), Some("2024-01-01 10:00"));
        assert_eq!(records[0].ms_played.as_deref(), Some("500"));
        assert_eq!(records[0].artist_name.as_deref(), Some("A"));
    }

    #[test]
    fn test_csv_ragged_row_is_malformed() {
        let err = read_csv(b"ts,ms_played\n2024-01-01,1\n2024-01-02,2,extra\n").unwrap_err();
        assert!(matches!(err, DataFormatError::Malformed { row: Some(2), .. }), "{err:?}");
    }

    #[test]
    fn test_json_extended_history_fields() {
        let input = br#"[
            {"ts": "2024-01-01T10:00:00Z", "ms_played": 215000,
             "master_metadata_track_name": "Song", "master_metadata_album_artist_name": "Band",
             "master_metadata_album_album_name": null, "platform": "ios", "skipped": true,
             "spotify_track_uri": "spotify:track:1"}
        ]"#;
        let records = read_json(input).unwrap();
        let record = &records[0];
        assert_eq!(record.ms_played.as_deref(), Some("215000"));
        assert_eq!(record.track_name.as_deref(), Some("Song"));
        assert_eq!(record.artist_name.as_deref(), Some("Band"));
        assert_eq!(record.album_name, None);
        assert_eq!(record.skipped.as_deref(), Some("true"));
        assert_eq!(record.track_uri.as_deref(), Some("spotify:track:1"));
    }

    #[test]
    fn test_json_missing_required_key() {
        let err = read_json(br#"[{"ms_played": 1}]"#).unwrap_err();
        assert_eq!(
            err,
            DataFormatError::MissingColumn {
                column: "ts".to_string()
            }
        );
    }

    #[test]
    fn test_json_shape_errors() {
        assert!(matches!(
            read_json(b"{\"ts\": 1}").unwrap_err(),
            DataFormatError::Malformed { row: None, .. }
        ));
        assert!(matches!(
            read_json(b"[1]").unwrap_err(),
            DataFormatError::Malformed { row: Some(1), .. }
        ));
        assert!(matches!(
            read_json(br#"[{"ts": ["a"], "ms_played": 1}]"#).unwrap_err(),
            DataFormatError::Malformed { row: Some(1), .. }
        ));
    }

    #[test]
    fn test_empty_json_array_is_empty() {
        assert!(read_json(b"[]").unwrap().is_empty());
    }

    #[test]
    fn test_format_resolution() {
        let json = Path::new("history.JSON");
        assert_eq!(resolve_format(InputFormat::Auto, Some(json), b""), InputFormat::Json);
        assert_eq!(
            resolve_format(InputFormat::Auto, Some(Path::new("a.csv")), b"[]"),
            InputFormat::Csv
        );
        assert_eq!(resolve_format(InputFormat::Auto, None, b"  \n[{}]"), InputFormat::Json);
        assert_eq!(resolve_format(InputFormat::Auto, None, b"ts,ms_played"), InputFormat::Csv);
        assert_eq!(resolve_format(InputFormat::Csv, Some(json), b"[]"), InputFormat::Csv);
    }
}
