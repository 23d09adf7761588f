use std::f32::consts::TAU;
use std::ops::RangeInclusive;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, RichText, Sense, Shape, Stroke, Ui, Vec2};
use egui_plot::{Bar, BarChart, GridMark, Plot};

use crate::color::{ContinuousScale, contrasting_text, generate_palette};
use crate::data::aggregate::{GroupCount, Share};

const CHART_HEIGHT: f32 = 280.0;

/// Warning shown in place of a chart when the filtered view is empty.
fn no_data(ui: &mut Ui, what: &str) {
    ui.colored_label(
        Color32::from_rgb(0xd9, 0x9a, 0x00),
        format!("⚠ No data to show in the {what} chart."),
    );
}

/// Axis formatter printing category labels at integer positions.
fn category_formatter(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let pos = mark.value.round();
        if (mark.value - pos).abs() > 1e-6 || pos < 0.0 {
            return String::new();
        }
        labels.get(pos as usize).cloned().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Ranking charts (horizontal bars)
// ---------------------------------------------------------------------------

/// Horizontal bars, smallest at the bottom. `fill` picks each bar's colour.
fn ranking_bars(ui: &mut Ui, id: &str, groups: &[GroupCount], fill: impl Fn(&GroupCount) -> Color32) {
    let labels: Vec<String> = groups.iter().map(|g| g.value.to_string()).collect();
    let bars: Vec<Bar> = groups
        .iter()
        .enumerate()
        .map(|(i, g)| {
            Bar::new(i as f64, g.count as f64)
                .name(g.value.to_string())
                .fill(fill(g))
                .width(0.7)
        })
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show_grid([true, false])
        .x_axis_label("Total medals")
        .y_axis_formatter(category_formatter(labels))
        .include_x(0.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
        });
}

/// Title of a ranking chart over `top_n` groups.
pub fn ranking_title(top_n: usize, subject: &str) -> String {
    format!("Top {top_n} {subject}")
}

pub fn top_countries(ui: &mut Ui, groups: &[GroupCount], top_n: usize) {
    ui.strong(ranking_title(top_n, "countries by number of medals"));
    if groups.is_empty() {
        no_data(ui, "countries");
        return;
    }
    let fill = ui.visuals().selection.bg_fill;
    ranking_bars(ui, "top_countries", groups, |_| fill);
}

pub fn top_athletes(ui: &mut Ui, groups: &[GroupCount], top_n: usize) {
    ui.strong(ranking_title(top_n, "athletes with most medals"));
    if groups.is_empty() {
        no_data(ui, "athletes");
        return;
    }
    let min = groups.iter().map(|g| g.count).min().unwrap_or(0) as f64;
    let max = groups.iter().map(|g| g.count).max().unwrap_or(0) as f64;
    ranking_bars(ui, "top_athletes", groups, |g| {
        ContinuousScale::Viridis.for_value(g.count as f64, min, max)
    });
}

// ---------------------------------------------------------------------------
// Medal-type histogram
// ---------------------------------------------------------------------------

pub fn medal_distribution(ui: &mut Ui, groups: &[GroupCount]) {
    ui.strong("Medal distribution");
    if groups.is_empty() {
        no_data(ui, "medals");
        return;
    }

    let palette = generate_palette(groups.len());
    let labels: Vec<String> = groups.iter().map(|g| g.value.to_string()).collect();
    let bars: Vec<Bar> = groups
        .iter()
        .zip(palette)
        .enumerate()
        .map(|(i, (g, color))| {
            Bar::new(i as f64, g.count as f64)
                .name(g.value.to_string())
                .fill(color)
                .width(0.9)
        })
        .collect();

    Plot::new("medal_distribution")
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show_grid([true, false])
        .x_axis_label("Medal type")
        .x_axis_formatter(category_formatter(labels))
        .include_y(0.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

// ---------------------------------------------------------------------------
// Sex donut
// ---------------------------------------------------------------------------

pub fn sex_donut(ui: &mut Ui, shares: &[Share]) {
    ui.strong("Share of medals by sex");
    if shares.is_empty() {
        no_data(ui, "sex");
        return;
    }

    let size = Vec2::new(ui.available_width(), CHART_HEIGHT);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let rect = response.rect;
    let center = rect.center();
    let outer = 0.45 * rect.height().min(rect.width());
    // Hole of half the outer radius; the ring is drawn as a thick arc at mid radius.
    let thickness = outer * 0.5;
    let mid = outer - thickness / 2.0;

    let palette = generate_palette(shares.len());
    let point_at = |angle: f32, radius: f32| -> Pos2 {
        center + Vec2::new(angle.cos(), angle.sin()) * radius
    };

    let mut start = -TAU / 4.0;
    for (share, color) in shares.iter().zip(&palette) {
        let sweep = share.share as f32 * TAU;
        if sweep >= TAU - 1e-4 {
            painter.circle_stroke(center, mid, Stroke::new(thickness, *color));
        } else if sweep > 0.0 {
            let steps = ((sweep * 48.0).ceil() as usize).max(2);
            let points: Vec<Pos2> = (0..=steps)
                .map(|s| point_at(start + sweep * s as f32 / steps as f32, mid))
                .collect();
            painter.add(Shape::line(points, Stroke::new(thickness, *color)));
        }

        if share.share >= 0.03 {
            painter.text(
                point_at(start + sweep / 2.0, mid),
                Align2::CENTER_CENTER,
                format!("{}\n{:.1}%", share.value, share.share * 100.0),
                FontId::proportional(13.0),
                contrasting_text(*color),
            );
        }
        start += sweep;
    }

    let hover = shares
        .iter()
        .map(|s| format!("{}: {} ({:.1}%)", s.value, s.count, s.share * 100.0))
        .collect::<Vec<_>>()
        .join("\n");
    response.on_hover_text(hover);
}

// ---------------------------------------------------------------------------
// Country choropleth (tile map keyed by ISO3)
// ---------------------------------------------------------------------------

pub fn country_tiles(ui: &mut Ui, groups: &[GroupCount]) {
    ui.strong("Total medals by country");
    if groups.is_empty() {
        no_data(ui, "map");
        return;
    }

    let min = groups.iter().map(|g| g.count).min().unwrap_or(0) as f64;
    let max = groups.iter().map(|g| g.count).max().unwrap_or(0) as f64;
    let scale = ContinuousScale::RdYlGn;

    egui::ScrollArea::vertical()
        .id_salt("country_tiles")
        .max_height(CHART_HEIGHT - 30.0)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal_wrapped(|ui: &mut Ui| {
                for g in groups {
                    let fill = scale.for_value(g.count as f64, min, max);
                    let text = RichText::new(format!(" {} ", g.value))
                        .monospace()
                        .background_color(fill)
                        .color(contrasting_text(fill));
                    ui.label(text)
                        .on_hover_text(format!("{}: {} medals", g.value, g.count));
                }
            });
        });

    color_legend(ui, scale, min, max);
}

/// Gradient strip with the scale's bounds at either end.
fn color_legend(ui: &mut Ui, scale: ContinuousScale, min: f64, max: f64) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!("{min}"));
        let (rect, _) = ui.allocate_exact_size(Vec2::new(160.0, 12.0), Sense::hover());
        let steps = 32;
        let step_width = rect.width() / steps as f32;
        for i in 0..steps {
            let x = rect.left() + i as f32 * step_width;
            let cell = egui::Rect::from_min_size(Pos2::new(x, rect.top()), Vec2::new(step_width + 0.5, rect.height()));
            ui.painter()
                .rect_filled(cell, 0.0, scale.at(i as f64 / (steps - 1) as f64));
        }
        ui.label(format!("{max}"));
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranking_title_uses_configured_size() {
        assert_eq!(ranking_title(10, "countries by number of medals"), "Top 10 countries by number of medals");
        assert_eq!(ranking_title(5, "athletes with most medals"), "Top 5 athletes with most medals");
    }
}
