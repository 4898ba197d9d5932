use super::model::{Dataset, Track};

// ---------------------------------------------------------------------------
// Year filter
// ---------------------------------------------------------------------------

/// Return the tracks released in `year`, in source order.
///
/// `None` means "All Years" and yields every track. A year with no tracks
/// yields an empty view rather than an error.
pub fn filter_by_year(dataset: &Dataset, year: Option<i32>) -> Vec<&Track> {
    match year {
        None => dataset.tracks.iter().collect(),
        Some(y) => dataset
            .tracks
            .iter()
            .filter(|t| t.year == Some(y))
            .collect(),
    }
}
