use eframe::egui::{self, RichText, Ui};

use crate::data::metrics::SummaryMetrics;
use crate::data::model::CellValue;

/// Shown in place of a mode when there is nothing to count.
pub const NO_DATA: &str = "—";

/// The row of five metric cards.
pub fn metric_cards(ui: &mut Ui, metrics: &SummaryMetrics) {
    let cards = [
        ("Total medals", format_thousands(metrics.total_medals)),
        ("Distinct countries", format_thousands(metrics.distinct_countries)),
        ("Most awarded sport", mode_text(&metrics.top_sport)),
        ("Most awarded country", mode_text(&metrics.top_country)),
        ("Most awarded athlete", mode_text(&metrics.top_athlete)),
    ];

    ui.columns(cards.len(), |cols| {
        for (col, (title, value)) in cols.iter_mut().zip(cards) {
            egui::Frame::group(col.style()).show(col, |ui: &mut Ui| {
                ui.set_min_width(ui.available_width());
                ui.label(RichText::new(title).small().weak());
                ui.label(RichText::new(value).size(22.0).strong());
            });
        }
    });
}

fn mode_text(value: &Option<CellValue>) -> String {
    value
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| NO_DATA.to_string())
}

/// `1234567` → `"1,234,567"`.
pub fn format_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
