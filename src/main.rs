mod app;
mod color;
mod config;
mod data;
mod series;
mod state;
mod ui;

use app::TechDashboardApp;
use config::DashboardConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::load();
    let app = TechDashboardApp::new(config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(app.state.config.window_size)
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Tech Dashboard – China vs Japan",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
}
