use eframe::egui::{self, ScrollArea, Ui};

use crate::color::KeywordColors;
use crate::state::AppState;
use crate::ui::{artist, panels, plot, tables};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
    colors: KeywordColors,
}

impl DashboardApp {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            colors: KeywordColors::default(),
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: year filter ----
        egui::SidePanel::left("filter_panel")
            .default_width(200.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: chart, tables, artist ----
        // Everything below reads the one snapshot computed for this selection.
        let snapshot = self.state.snapshot();
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    ui.vertical_centered(|ui: &mut Ui| {
                        ui.heading("Spotify Data Dashboard");
                        let scope = match snapshot.year {
                            Some(year) => format!("Tracks released in {year}"),
                            None => "All years".to_string(),
                        };
                        ui.label(scope);
                    });
                    ui.separator();

                    if snapshot.is_empty() {
                        ui.label("No tracks for the selected year.");
                        ui.separator();
                    }

                    plot::keyword_chart(ui, &snapshot.keywords, &self.colors);
                    ui.separator();

                    tables::songs_table(ui, &snapshot.songs);
                    ui.add_space(12.0);
                    tables::albums_table(ui, &snapshot.albums);
                    ui.separator();

                    artist::artist_details(ui, &snapshot.artist);
                });
        });
    }
}
