use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::aggregate::DashboardSnapshot;
use crate::data::error::LoadError;
use crate::data::loader::load_file;
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset, shared read-only with every recomputation.
    pub dataset: Arc<Dataset>,

    /// Where `dataset` was read from.
    pub source: PathBuf,

    /// Selected year; `None` shows all years.
    selected_year: Option<i32>,

    /// Views derived from `dataset` and `selected_year`.
    snapshot: DashboardSnapshot,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dataset: Arc<Dataset>, source: PathBuf) -> Self {
        let snapshot = DashboardSnapshot::compute(&dataset, None);
        Self {
            dataset,
            source,
            selected_year: None,
            snapshot,
            status_message: None,
        }
    }

    pub fn selected_year(&self) -> Option<i32> {
        self.selected_year
    }

    pub fn snapshot(&self) -> &DashboardSnapshot {
        &self.snapshot
    }

    /// Change the year filter and recompute every view before returning.
    pub fn select_year(&mut self, year: Option<i32>) {
        self.selected_year = year;
        self.snapshot = DashboardSnapshot::compute(&self.dataset, year);
    }

    /// Replace the dataset; the filter resets to all years.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>, source: PathBuf) {
        self.dataset = dataset;
        self.source = source;
        self.status_message = None;
        self.select_year(None);
    }

    /// Load `path` and switch to it. On failure the current dataset and
    /// selection stay untouched.
    pub fn open(&mut self, path: &Path) -> Result<(), LoadError> {
        let dataset = load_file(path)?;
        self.set_dataset(Arc::new(dataset), path.to_path_buf());
        Ok(())
    }
}
