//! Derived dashboard views: keyword, song, album and artist rankings.
//!
//! Every function here is pure over a slice of borrowed tracks and total over
//! the empty slice. Ties are resolved deterministically: individual tracks
//! keep source order, groups (albums, artists) fall back to name ascending,
//! and keywords fall back to [`Keyword`] declaration order.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::data::filter::filter_by_year;
use crate::data::model::{Dataset, Keyword, Track};

/// Length of every ranking shown on the dashboard.
pub const TOP_N: usize = 3;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct KeywordScore {
    pub keyword: Keyword,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SongScore {
    pub track_name: String,
    pub popularity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlbumScore {
    pub album_name: String,
    pub average_popularity: f64,
}

pub type KeywordRanking = Vec<KeywordScore>;
pub type SongRanking = Vec<SongScore>;
pub type AlbumRanking = Vec<AlbumScore>;

/// The artist with the highest mean popularity in a view.
#[derive(Debug, Clone, PartialEq)]
pub struct TopArtist {
    pub artist_name: String,
    pub average_popularity: f64,
    pub top_album: String,
    pub top_tracks: SongRanking,
    pub keywords: KeywordRanking,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArtistDetail {
    Available(TopArtist),
    /// The view held no tracks, so there is no artist to show.
    NoArtist,
}

impl ArtistDetail {
    pub fn artist(&self) -> Option<&TopArtist> {
        match self {
            ArtistDetail::Available(a) => Some(a),
            ArtistDetail::NoArtist => None,
        }
    }
}

/// All four views computed from one and the same subset.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub year: Option<i32>,
    pub track_count: usize,
    pub keywords: KeywordRanking,
    pub songs: SongRanking,
    pub albums: AlbumRanking,
    pub artist: ArtistDetail,
}

impl DashboardSnapshot {
    /// Filter `dataset` by `year` once and derive every view from that subset.
    pub fn compute(dataset: &Dataset, year: Option<i32>) -> Self {
        let subset = filter_by_year(dataset, year);
        log::debug!("Recomputing dashboard for {year:?} over {} tracks", subset.len());
        Self::from_subset(year, &subset)
    }

    pub fn from_subset(year: Option<i32>, subset: &[&Track]) -> Self {
        DashboardSnapshot {
            year,
            track_count: subset.len(),
            keywords: keyword_ranking(subset),
            songs: song_ranking(subset),
            albums: album_ranking(subset),
            artist: artist_detail(subset),
        }
    }

    /// Whether the selection matched no tracks.
    pub fn is_empty(&self) -> bool {
        self.track_count == 0
    }
}

// ---------------------------------------------------------------------------
// Aggregations
// ---------------------------------------------------------------------------

/// Mean of each audio feature, highest first.
pub fn keyword_ranking(subset: &[&Track]) -> KeywordRanking {
    if subset.is_empty() {
        return Vec::new();
    }
    let n = subset.len() as f64;
    let mut ranking: KeywordRanking = Keyword::ALL
        .iter()
        .map(|&keyword| KeywordScore {
            keyword,
            average: subset.iter().map(|t| keyword.value(t)).sum::<f64>() / n,
        })
        .collect();
    // stable: equal means keep priority order
    ranking.sort_by(|a, b| descending(a.average, b.average));
    ranking.truncate(TOP_N);
    ranking
}

/// The most popular tracks, ties in source order.
pub fn song_ranking(subset: &[&Track]) -> SongRanking {
    let mut sorted = subset.to_vec();
    sorted.sort_by(|a, b| descending(a.popularity, b.popularity));
    sorted
        .into_iter()
        .take(TOP_N)
        .map(|t| SongScore {
            track_name: t.track_name.clone(),
            popularity: t.popularity,
        })
        .collect()
}

/// Albums by mean popularity, ties by album name.
pub fn album_ranking(subset: &[&Track]) -> AlbumRanking {
    mean_popularity_by(subset, |t| &t.album_name)
        .into_iter()
        .take(TOP_N)
        .map(|(name, average_popularity)| AlbumScore {
            album_name: name.to_string(),
            average_popularity,
        })
        .collect()
}

/// Details of the artist with the highest mean popularity.
pub fn artist_detail(subset: &[&Track]) -> ArtistDetail {
    let Some((artist, average_popularity)) =
        mean_popularity_by(subset, |t| &t.artist_name).into_iter().next()
    else {
        return ArtistDetail::NoArtist;
    };

    let tracks: Vec<&Track> = subset
        .iter()
        .copied()
        .filter(|t| t.artist_name == artist)
        .collect();

    // The artist has at least one track, hence at least one album.
    let top_album = mean_popularity_by(&tracks, |t| &t.album_name)
        .into_iter()
        .next()
        .map(|(name, _)| name.to_string())
        .unwrap_or_default();

    ArtistDetail::Available(TopArtist {
        artist_name: artist.to_string(),
        average_popularity,
        top_album,
        top_tracks: song_ranking(&tracks),
        keywords: keyword_ranking(&tracks),
    })
}

/// Group by `key`, average popularity per group, sort highest first.
///
/// Groups come out of the map name-ascending and the sort is stable, so
/// equal means stay in name order.
fn mean_popularity_by<'a>(
    subset: &[&'a Track],
    key: impl Fn(&'a Track) -> &'a String,
) -> Vec<(&'a str, f64)> {
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for &track in subset {
        let entry = groups.entry(key(track).as_str()).or_insert((0.0, 0));
        entry.0 += track.popularity;
        entry.1 += 1;
    }

    let mut means: Vec<(&str, f64)> = groups
        .into_iter()
        .map(|(name, (sum, count))| (name, sum / count as f64))
        .collect();
    means.sort_by(|a, b| descending(a.1, b.1));
    means
}

/// Values are finite after load; `-0.0` and `0.0` compare equal.
fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
