use eframe::egui::{self, Ui};

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct TechDashboardApp {
    pub state: AppState,
}

impl TechDashboardApp {
    /// Build the app, opening the configured dataset if there is one.
    pub fn new(config: DashboardConfig) -> Self {
        let dataset = config.dataset.clone();
        let mut state = AppState::new(config);
        if let Some(path) = dataset {
            state.open(&path);
        }
        Self { state }
    }
}

impl eframe::App for TechDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: 2×2 chart grid ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(dashboard) = &self.state.dashboard else {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading("Open a dataset to start  (File → Open…)");
                });
                return;
            };
            let charts = dashboard.charts();
            let colors = &self.state.colors;
            let radius = self.state.config.bubble_radius;
            let chart_height = (ui.available_height() / 2.0 - 40.0).max(160.0);

            ui.columns(2, |cols| {
                plot::bar_chart(&mut cols[0], &charts.bar, colors, chart_height);
                plot::line_chart(&mut cols[1], &charts.line, colors, chart_height);
            });
            ui.separator();
            ui.columns(2, |cols| {
                plot::scatter_plot(&mut cols[0], &charts.scatter, colors, radius, chart_height);
                table::data_table(&mut cols[1], &charts.table, chart_height);
            });
        });
    }
}
