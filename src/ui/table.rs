use eframe::egui::{Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::series::TableSeries;
use crate::ui::format::format_metric_value;

const ROW_HEIGHT: f32 = 18.0;

/// Render the filtered rows with the selected metric as the last column.
pub fn data_table(ui: &mut Ui, table: &TableSeries, height: f32) {
    ui.label(RichText::new(format!("Records ({})", table.rows.len())).strong());
    if table.is_empty() {
        ui.label(RichText::new("No data for the current selection").color(Color32::GRAY));
        return;
    }

    let headers = ["Country", "Year", "Tech Sector", table.metric.label()];

    TableBuilder::new(ui)
        .striped(true)
        .max_scroll_height(height)
        .column(Column::auto().at_least(70.0))
        .column(Column::auto().at_least(50.0))
        .column(Column::auto().at_least(120.0))
        .column(Column::remainder())
        .header(ROW_HEIGHT + 4.0, |mut header| {
            for title in headers {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, table.rows.len(), |mut row| {
                let r = &table.rows[row.index()];
                row.col(|ui| {
                    ui.label(&r.country);
                });
                row.col(|ui| {
                    ui.label(r.year.to_string());
                });
                row.col(|ui| {
                    ui.label(&r.tech_sector);
                });
                row.col(|ui| {
                    ui.label(format_metric_value(r.value, table.metric));
                });
            });
        });
}
