mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::MedalDashboardApp;
use config::DashboardConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::from_args(std::env::args());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size),
        ..Default::default()
    };

    eframe::run_native(
        "Olympic Medals Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(MedalDashboardApp::new(config)))),
    )
}
