use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Plot};

use crate::aggregate::KeywordRanking;
use crate::color::KeywordColors;

// ---------------------------------------------------------------------------
// Keyword bar chart (central panel)
// ---------------------------------------------------------------------------

/// Render the average-feature bar chart, one bar per ranked keyword.
pub fn keyword_chart(ui: &mut Ui, keywords: &KeywordRanking, colors: &KeywordColors) {
    ui.heading("Top 3 Keywords by Popularity");

    let bars: Vec<Bar> = keywords
        .iter()
        .enumerate()
        .map(|(i, score)| {
            Bar::new(i as f64, score.average)
                .name(score.keyword.name())
                .fill(colors.color_for(score.keyword))
                .width(0.6)
        })
        .collect();

    let labels: Vec<&'static str> = keywords.iter().map(|k| k.keyword.name()).collect();

    Plot::new("keyword_chart")
        .height(240.0)
        .x_axis_label("Keywords")
        .y_axis_label("Average Value")
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).map(|l| l.to_string()).unwrap_or_default()
        })
        .include_y(0.0)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}
