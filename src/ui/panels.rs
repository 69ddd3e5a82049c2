use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::model::{Metric, ALL_SECTORS};
use crate::state::{AppState, DashboardInput};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel. Each widget feeds exactly one input.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dashboard) = &state.dashboard else {
        ui.label("No dataset loaded.");
        return;
    };

    let current = dashboard.state().clone();
    let sectors = dashboard.dataset().tech_sectors.clone();
    let years = dashboard.dataset().years.clone();
    let mut inputs: Vec<DashboardInput> = Vec::new();

    // ---- Tech sector ----
    ui.strong("Tech Sector");
    egui::ComboBox::from_id_salt("tech_sector")
        .selected_text(current.tech_sector())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for sector in std::iter::once(ALL_SECTORS).chain(sectors.iter().map(String::as_str)) {
                if ui
                    .selectable_label(current.tech_sector() == sector, sector)
                    .clicked()
                {
                    inputs.push(DashboardInput::TechSector(sector.to_string()));
                }
            }
        });
    ui.add_space(6.0);

    // ---- Metric ----
    ui.strong("Metric");
    egui::ComboBox::from_id_salt("metric")
        .selected_text(current.metric().label())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for metric in Metric::ALL {
                if ui
                    .selectable_label(current.metric() == metric, metric.label())
                    .clicked()
                {
                    inputs.push(DashboardInput::Metric(metric));
                }
            }
        });
    ui.add_space(6.0);

    // ---- Year range ----
    ui.strong("Year Range");
    ui.horizontal(|ui: &mut Ui| {
        egui::ComboBox::from_id_salt("start_year")
            .selected_text(current.start_year().to_string())
            .show_ui(ui, |ui: &mut Ui| {
                for &y in &years {
                    if ui
                        .selectable_label(current.start_year() == y, y.to_string())
                        .clicked()
                    {
                        inputs.push(DashboardInput::StartYear(y));
                    }
                }
            });
        ui.label("to");
        egui::ComboBox::from_id_salt("end_year")
            .selected_text(current.end_year().to_string())
            .show_ui(ui, |ui: &mut Ui| {
                for &y in &years {
                    if ui
                        .selectable_label(current.end_year() == y, y.to_string())
                        .clicked()
                    {
                        inputs.push(DashboardInput::EndYear(y));
                    }
                }
            });
    });
    ui.add_space(6.0);

    // ---- Single year (bar chart) ----
    ui.strong("Bar Chart Year");
    let (lo, hi) = current.slider_bounds();
    let mut year = current.year();
    if ui.add(egui::Slider::new(&mut year, lo..=hi)).changed() && year != current.year() {
        inputs.push(DashboardInput::Year(year));
    }

    for input in inputs {
        state.apply(input);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(dashboard) = &state.dashboard {
            let ds = dashboard.dataset();
            ui.label(format!(
                "{} records, {} visible",
                ds.len(),
                dashboard.charts().table.rows.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open technology dataset")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
