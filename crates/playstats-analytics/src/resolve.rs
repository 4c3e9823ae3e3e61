//! Sentinel filling for absent track, artist and album names.

use crate::model::{NormalizedRow, PlayEvent};
use tracing::{debug, instrument};

/// Label for a play with no recorded track title.
pub const UNKNOWN_TRACK: &str = "Unknown Track";
/// Label for a play with no recorded artist.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
/// Label for a play with no recorded album.
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

/// How many values each sentinel replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillCounts {
    /// Rows given [`UNKNOWN_TRACK`].
    pub tracks: usize,
    /// Rows given [`UNKNOWN_ARTIST`].
    pub artists: usize,
    /// Rows given [`UNKNOWN_ALBUM`].
    pub albums: usize,
}

/// Turns normalized rows into play events, filling absent names with sentinels.
///
/// Platform, skip flag and track identifier stay optional.
#[instrument(skip_all, fields(rows = rows.len()))]
pub fn resolve_missing(rows: Vec<NormalizedRow>) -> Vec<PlayEvent> {
    let (events, counts) = resolve_with_counts(rows);
    if counts != FillCounts::default() {
        debug!(
            tracks = counts.tracks,
            artists = counts.artists,
            albums = counts.albums,
            "Filled missing names"
        );
    }
    events
}

/// Like [`resolve_missing`], also reporting how many values were filled.
pub fn resolve_with_counts(rows: Vec<NormalizedRow>) -> (Vec<PlayEvent>, FillCounts) {
    let mut counts = FillCounts::default();
    let events = rows
        .into_iter()
        .map(|row| PlayEvent {
            timestamp: row.timestamp,
            ms_played: row.ms_played,
            track_name: fill(row.track_name, UNKNOWN_TRACK, &mut counts.tracks),
            artist_name: fill(row.artist_name, UNKNOWN_ARTIST, &mut counts.artists),
            album_name: fill(row.album_name, UNKNOWN_ALBUM, &mut counts.albums),
            platform: row.platform,
            skipped: row.skipped,
            track_uri: row.track_uri,
        })
        .collect();
    (events, counts)
}

fn fill(value: Option<String>, sentinel: &str, counter: &mut usize) -> String {
    value.unwrap_or_else(|| {
        *counter += 1;
        sentinel.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use playstats_common::test_utils::mock_timestamp;
    use chrono_tz::Tz;

    fn row(track: Option<&str>, artist: Option<&str>) -> NormalizedRow {
        NormalizedRow {
            timestamp: mock_timestamp(2024, 1, 1, 12, 0, 0).with_timezone(&Tz::UTC),
            ms_played: 1_000,
            track_name: track.map(str::to_string),
            artist_name: artist.map(str::to_string),
            album_name: None,
            platform: None,
            skipped: None,
            track_uri: None,
        }
    }

    #[test]
    fn test_sentinels_fill_only_missing_names() {
        let (events, counts) =
            resolve_with_counts(vec![row(Some("A"), None), row(None, Some("X"))]);

        assert_eq!(events[0].track_name, "A");
        assert_eq!(events[0].artist_name, UNKNOWN_ARTIST);
        assert_eq!(events[1].track_name, UNKNOWN_TRACK);
        assert_eq!(events[1].artist_name, "X");
        assert!(events.iter().all(|e| e.album_name == UNKNOWN_ALBUM));
        assert!(events.iter().all(|e| e.platform.is_none() && e.skipped.is_none()));
        assert_eq!(
            counts,
            FillCounts {
                tracks: 1,
                artists: 1,
                albums: 2
            }
        );
    }

    #[test]
    fn test_order_is_preserved() {
        let events = resolve_missing(vec![row(Some("1"), None), row(Some("2"), None)]);
        let names: Vec<_> = events.iter().map(|e| e.track_name.as_str()).collect();
        assert_eq!(names, ["1", "2"]);
    }
}
