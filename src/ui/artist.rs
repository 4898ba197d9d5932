use eframe::egui::{RichText, Ui};

use crate::aggregate::ArtistDetail;
use crate::data::model::format_score;

/// Render the top-artist panel, or a placeholder when the view is empty.
pub fn artist_details(ui: &mut Ui, detail: &ArtistDetail) {
    ui.heading("Top Artist Details");

    let Some(artist) = detail.artist() else {
        ui.label(RichText::new("No artist available for the selected year.").italics());
        return;
    };

    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(format!("Top Artist: {}", artist.artist_name)).strong().size(18.0));
        ui.label(format!(
            "Average Popularity: {}",
            format_score(artist.average_popularity)
        ));
        ui.label(format!("Most Popular Album: {}", artist.top_album));

        ui.add_space(6.0);
        ui.strong("Top 3 Tracks:");
        for track in &artist.top_tracks {
            ui.label(format!(
                "• {} (Popularity: {})",
                track.track_name,
                format_score(track.popularity)
            ));
        }

        ui.add_space(6.0);
        ui.strong("Top Keywords:");
        for score in &artist.keywords {
            ui.label(format!("• {}", score.keyword));
        }
    });
}
