use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – year filter
// ---------------------------------------------------------------------------

const ALL_YEARS: &str = "All Years";

fn year_label(year: Option<i32>) -> String {
    year.map(|y| y.to_string())
        .unwrap_or_else(|| ALL_YEARS.to_string())
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    ui.strong("Select Year:");

    let current = state.selected_year();
    let mut choice = current;
    let years: Vec<i32> = state.dataset.years().iter().copied().collect();

    egui::ComboBox::from_id_salt("year_filter")
        .selected_text(year_label(current))
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(&mut choice, None, ALL_YEARS);
            for year in years {
                ui.selectable_value(&mut choice, Some(year), year.to_string());
            }
        });

    if choice != current {
        log::debug!("Year filter changed to {}", year_label(choice));
        state.select_year(choice);
    }

    ui.add_space(8.0);
    ui.label(format!("{} distinct years", state.dataset.years().len()));
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} tracks loaded, {} in view",
            state.dataset.len(),
            state.snapshot().track_count
        ));

        ui.separator();
        ui.label(RichText::new(state.source.display().to_string()).weak());

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open track dataset")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match state.open(&path) {
            Ok(()) => {
                log::info!(
                    "Switched to {} ({} tracks)",
                    path.display(),
                    state.dataset.len()
                );
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
