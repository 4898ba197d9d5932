use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::aggregate::{AlbumRanking, SongRanking};
use crate::data::model::format_score;

const ROW_HEIGHT: f32 = 20.0;

/// Two-column striped table; `rows` yields (name, score) pairs.
fn ranking_table<'a>(
    ui: &mut Ui,
    id: &str,
    headers: [&str; 2],
    rows: impl Iterator<Item = (&'a str, f64)>,
) {
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(Column::remainder().at_least(200.0))
            .column(Column::auto().at_least(120.0))
            .header(ROW_HEIGHT, |mut header| {
                for title in headers {
                    header.col(|ui: &mut Ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for (name, score) in rows {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui: &mut Ui| {
                            ui.label(name);
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(format_score(score));
                        });
                    });
                }
            });
    });
}

pub fn songs_table(ui: &mut Ui, songs: &SongRanking) {
    ui.heading("Top 3 Songs");
    ranking_table(
        ui,
        "top_songs",
        ["Track Name", "Popularity"],
        songs.iter().map(|s| (s.track_name.as_str(), s.popularity)),
    );
}

pub fn albums_table(ui: &mut Ui, albums: &AlbumRanking) {
    ui.heading("Top 3 Albums");
    ranking_table(
        ui,
        "top_albums",
        ["Album Name", "Average Popularity"],
        albums
            .iter()
            .map(|a| (a.album_name.as_str(), a.average_popularity)),
    );
}
