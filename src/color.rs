use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Keyword;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            // Start at Spotify green rather than red.
            let hue = (140.0 + (i as f32 / n as f32) * 360.0) % 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.5);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Keyword colours
// ---------------------------------------------------------------------------

/// Fixed colour per keyword, so a bar keeps its colour when the ranking
/// order changes between years.
#[derive(Debug, Clone)]
pub struct KeywordColors {
    mapping: BTreeMap<Keyword, Color32>,
}

impl Default for KeywordColors {
    fn default() -> Self {
        let mapping = Keyword::ALL
            .into_iter()
            .zip(generate_palette(Keyword::ALL.len()))
            .collect();
        KeywordColors { mapping }
    }
}

impl KeywordColors {
    pub fn color_for(&self, keyword: Keyword) -> Color32 {
        self.mapping.get(&keyword).copied().unwrap_or(Color32::GRAY)
    }
}
