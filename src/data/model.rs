use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const TRACK_NAME: &str = "track_name";
pub const ALBUM_NAME: &str = "album_name";
pub const ARTIST_NAME: &str = "artist_name";
pub const POPULARITY: &str = "popularity";
pub const DANCEABILITY: &str = "danceability";
pub const ENERGY: &str = "energy";
pub const VALENCE: &str = "valence";
pub const YEAR: &str = "year";

/// Columns every dataset must provide. Anything else in the file is ignored.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    TRACK_NAME,
    ALBUM_NAME,
    ARTIST_NAME,
    POPULARITY,
    DANCEABILITY,
    ENERGY,
    VALENCE,
    YEAR,
];

// ---------------------------------------------------------------------------
// Track – one row of the source table
// ---------------------------------------------------------------------------

/// A single track (one row of the source table).
///
/// Numeric fields are guaranteed finite by the loader.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub track_name: String,
    pub album_name: String,
    pub artist_name: String,
    pub popularity: f64,
    pub danceability: f64,
    pub energy: f64,
    pub valence: f64,
    /// Release year; `None` when the source cell was empty.
    pub year: Option<i32>,
}

// ---------------------------------------------------------------------------
// Keyword – the audio features shown in the bar chart
// ---------------------------------------------------------------------------

/// An audio feature averaged and ranked for display.
///
/// Declaration order is the tie-break priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Keyword {
    Danceability,
    Energy,
    Valence,
}

impl Keyword {
    pub const ALL: [Keyword; 3] = [Keyword::Danceability, Keyword::Energy, Keyword::Valence];

    /// Column name, also used as the display label.
    pub fn name(self) -> &'static str {
        match self {
            Keyword::Danceability => DANCEABILITY,
            Keyword::Energy => ENERGY,
            Keyword::Valence => VALENCE,
        }
    }

    /// Read this feature off a track.
    pub fn value(self, track: &Track) -> f64 {
        match self {
            Keyword::Danceability => track.danceability,
            Keyword::Energy => track.energy,
            Keyword::Valence => track.valence,
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with the pre-computed year index.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// All tracks, in source order.
    pub tracks: Vec<Track>,
    years: BTreeSet<i32>,
}

impl Dataset {
    /// Build the year index from the loaded tracks.
    pub fn from_tracks(tracks: Vec<Track>) -> Self {
        let years = tracks.iter().filter_map(|t| t.year).collect();
        Dataset { tracks, years }
    }

    /// Distinct non-null years, ascending.
    pub fn years(&self) -> &BTreeSet<i32> {
        &self.years
    }

    /// Number of tracks.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Format a score the way the source table wrote it: integral values without
/// a fractional part, everything else with two decimals.
pub fn format_score(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn track(name: &str, album: &str, artist: &str, popularity: f64, year: Option<i32>) -> Track {
        Track {
            track_name: name.to_string(),
            album_name: album.to_string(),
            artist_name: artist.to_string(),
            popularity,
            danceability: 0.5,
            energy: 0.5,
            valence: 0.5,
            year,
        }
    }

    #[test]
    fn years_are_distinct_sorted_and_skip_missing() {
        let ds = Dataset::from_tracks(vec![
            track("a", "x", "p", 10.0, Some(2021)),
            track("b", "x", "p", 20.0, None),
            track("c", "y", "q", 30.0, Some(2019)),
            track("d", "y", "q", 40.0, Some(2021)),
        ]);

        let years: Vec<i32> = ds.years().iter().copied().collect();
        assert_eq!(years, vec![2019, 2021]);
        assert_eq!(ds.len(), 4);
        assert!(!ds.is_empty());
    }

    #[test]
    fn empty_dataset_has_no_years() {
        let ds = Dataset::from_tracks(Vec::new());
        assert!(ds.is_empty());
        assert!(ds.years().is_empty());
    }

    #[test]
    fn keyword_reads_matching_feature() {
        let mut t = track("a", "x", "p", 10.0, None);
        t.danceability = 0.1;
        t.energy = 0.2;
        t.valence = 0.3;
        assert_eq!(Keyword::Danceability.value(&t), 0.1);
        assert_eq!(Keyword::Energy.value(&t), 0.2);
        assert_eq!(Keyword::Valence.value(&t), 0.3);
        assert_eq!(Keyword::Energy.to_string(), "energy");
    }

    #[test]
    fn format_score_drops_fraction_for_integers() {
        assert_eq!(format_score(90.0), "90");
        assert_eq!(format_score(85.5), "85.50");
        assert_eq!(format_score(0.123), "0.12");
    }
}
