//! Top-N tables by artist, track, album and platform.

use super::{tally_by, Tally};
use crate::filter::FilteredView;
use playstats_common::percentage;
use serde::Serialize;
use std::collections::BTreeMap;

/// What a ranking orders by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankBy {
    /// Number of plays.
    Plays,
    /// Total listening time.
    Minutes,
}

/// One row of an artist ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistRank {
    /// 1-based position.
    pub rank: usize,
    /// Artist name.
    pub artist: String,
    /// Number of plays.
    pub plays: usize,
    /// Total minutes played.
    pub minutes: f64,
}

/// One row of a track ranking. Tracks are keyed by title and artist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackRank {
    /// 1-based position.
    pub rank: usize,
    /// Track title.
    pub track: String,
    /// Artist name.
    pub artist: String,
    /// Number of plays.
    pub plays: usize,
    /// Total minutes played.
    pub minutes: f64,
}

/// One row of an album ranking. Albums are keyed by title and artist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlbumRank {
    /// 1-based position.
    pub rank: usize,
    /// Album title.
    pub album: String,
    /// Artist name.
    pub artist: String,
    /// Number of plays.
    pub plays: usize,
    /// Total minutes played.
    pub minutes: f64,
}

/// Play count of one platform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformShare {
    /// Platform value; `None` for plays without one.
    pub platform: Option<String>,
    /// Number of plays.
    pub plays: usize,
    /// Percentage of all plays in view.
    pub share: f64,
}

/// Orders groups by the chosen measure, descending, and keeps the first `limit`.
///
/// Groups arrive in ascending key order and the sort is stable, so ties keep
/// that order.
fn ranked<K: Ord>(groups: BTreeMap<K, Tally>, by: RankBy, limit: usize) -> Vec<(K, Tally)> {
    let mut entries: Vec<(K, Tally)> = groups.into_iter().collect();
    match by {
        RankBy::Plays => entries.sort_by(|a, b| b.1.plays.cmp(&a.1.plays)),
        RankBy::Minutes => entries.sort_by(|a, b| b.1.ms.cmp(&a.1.ms)),
    }
    entries.truncate(limit);
    entries
}

/// Top `limit` artists.
pub fn top_artists(view: &FilteredView<'_>, by: RankBy, limit: usize) -> Vec<ArtistRank> {
    let groups = tally_by(view.iter(), |e| e.artist_name.clone());
    ranked(groups, by, limit)
        .into_iter()
        .enumerate()
        .map(|(i, (artist, tally))| ArtistRank {
            rank: i + 1,
            artist,
            plays: tally.plays,
            minutes: tally.minutes(),
        })
        .collect()
}

/// Top `limit` (track, artist) pairs.
pub fn top_tracks(view: &FilteredView<'_>, by: RankBy, limit: usize) -> Vec<TrackRank> {
    let groups = tally_by(view.iter(), |e| (e.track_name.clone(), e.artist_name.clone()));
    ranked(groups, by, limit)
        .into_iter()
        .enumerate()
        .map(|(i, ((track, artist), tally))| TrackRank {
            rank: i + 1,
            track,
            artist,
            plays: tally.plays,
            minutes: tally.minutes(),
        })
        .collect()
}

/// Top `limit` (album, artist) pairs.
pub fn top_albums(view: &FilteredView<'_>, by: RankBy, limit: usize) -> Vec<AlbumRank> {
    let groups = tally_by(view.iter(), |e| (e.album_name.clone(), e.artist_name.clone()));
    ranked(groups, by, limit)
        .into_iter()
        .enumerate()
        .map(|(i, ((album, artist), tally))| AlbumRank {
            rank: i + 1,
            album,
            artist,
            plays: tally.plays,
            minutes: tally.minutes(),
        })
        .collect()
}

/// Top artists by play count.
pub fn top_artists_by_plays(view: &FilteredView<'_>, limit: usize) -> Vec<ArtistRank> {
    top_artists(view, RankBy::Plays, limit)
}

/// Top artists by total minutes.
pub fn top_artists_by_minutes(view: &FilteredView<'_>, limit: usize) -> Vec<ArtistRank> {
    top_artists(view, RankBy::Minutes, limit)
}

/// Top tracks by play count.
pub fn top_tracks_by_plays(view: &FilteredView<'_>, limit: usize) -> Vec<TrackRank> {
    top_tracks(view, RankBy::Plays, limit)
}

/// Top tracks by total minutes.
pub fn top_tracks_by_minutes(view: &FilteredView<'_>, limit: usize) -> Vec<TrackRank> {
    top_tracks(view, RankBy::Minutes, limit)
}

/// Top albums by play count.
pub fn top_albums_by_plays(view: &FilteredView<'_>, limit: usize) -> Vec<AlbumRank> {
    top_albums(view, RankBy::Plays, limit)
}

/// Top albums by total minutes.
pub fn top_albums_by_minutes(view: &FilteredView<'_>, limit: usize) -> Vec<AlbumRank> {
    top_albums(view, RankBy::Minutes, limit)
}

/// Play count per platform, most used first.
pub fn platform_distribution(view: &FilteredView<'_>) -> Vec<PlatformShare> {
    let total = view.len();
    let groups = tally_by(view.iter(), |e| e.platform.clone());
    ranked(groups, RankBy::Plays, usize::MAX)
        .into_iter()
        .map(|(platform, tally)| PlatformShare {
            platform,
            plays: tally.plays,
            share: percentage(tally.plays, total),
        })
        .collect()
}
