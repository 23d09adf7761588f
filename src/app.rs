use eframe::egui::{self, RichText, ScrollArea};

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::{charts, metrics, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct MedalDashboardApp {
    pub state: AppState,
}

impl MedalDashboardApp {
    /// Build the app and load the configured data file right away.
    pub fn new(config: DashboardConfig) -> Self {
        let path = config.data_path.clone();
        let mut state = AppState::new(config);
        state.load_path(&path);
        Self { state }
    }
}

impl eframe::App for MedalDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        if self.state.table.is_some() {
            egui::SidePanel::left("filter_panel")
                .default_width(260.0)
                .resizable(true)
                .show(ctx, |ui| {
                    panels::side_panel(ui, &mut self.state);
                });
        }

        // ---- Central panel: dashboard ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(err) = &self.state.load_error {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        RichText::new(format!("Could not load data:\n{err}"))
                            .color(egui::Color32::RED)
                            .heading(),
                    );
                });
                return;
            }

            let (Some(data), Some(view)) = (&self.state.table, &self.state.view) else {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a file to view medals  (File → Open…)");
                });
                return;
            };

            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    let title = match self.state.year_span() {
                        Some(span) => format!("Olympic Medals Dashboard {span}"),
                        None => "Olympic Medals Dashboard".to_string(),
                    };
                    ui.heading(title);
                    ui.label("Explore the medal records. Use the filters on the left to refine the analysis.");
                    ui.add_space(8.0);

                    ui.strong("Overall metrics");
                    metrics::metric_cards(ui, &view.metrics);
                    ui.separator();

                    ui.strong("Charts");
                    let top_n = self.state.config.top_n;
                    ui.columns(2, |cols| {
                        charts::top_countries(&mut cols[0], &view.top_countries, top_n);
                        charts::medal_distribution(&mut cols[1], &view.medal_distribution);
                    });
                    ui.columns(2, |cols| {
                        charts::sex_donut(&mut cols[0], &view.sex_shares);
                        charts::country_tiles(&mut cols[1], &view.medals_by_iso3);
                    });
                    charts::top_athletes(ui, &view.top_athletes, top_n);
                    ui.separator();

                    ui.strong("Detailed data");
                    table::detail_table(ui, data, &view.filtered);
                });
        });
    }
}
