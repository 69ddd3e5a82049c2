use eframe::egui::{Align2, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoint, PlotPoints, Points};

use crate::color::CountryColors;
use crate::data::model::{Metric, ALL_SECTORS};
use crate::series::scatter::{ScatterPoint, SIZE_METRIC, X_METRIC, Y_METRIC};
use crate::series::{BarSeries, LineSeries, ScatterSeries};
use crate::ui::format::{format_compact, format_metric_value};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Placeholder drawn instead of a chart when the selection is empty.
fn no_data(ui: &mut Ui, height: f32) {
    let (rect, _) = ui.allocate_exact_size(
        [ui.available_width(), height].into(),
        eframe::egui::Sense::hover(),
    );
    ui.painter().text(
        rect.center(),
        Align2::CENTER_CENTER,
        "No data for the current selection",
        eframe::egui::FontId::proportional(14.0),
        Color32::GRAY,
    );
}

/// Hover text for one country's value, e.g. `China (2020)` over `Market Share (%): 41.5`.
fn value_label(country: &str, year: i32, metric: Metric, value: f64) -> String {
    format!(
        "{country} ({year})\n{}: {}",
        metric.label(),
        format_metric_value(value, metric)
    )
}

/// Hover text for a scatter bubble.
fn bubble_label(p: &ScatterPoint) -> String {
    format!(
        "{} ({})\nSector: {}\n{}: {}\n{}: {}\n{}: {}",
        p.country,
        p.year,
        p.tech_sector,
        X_METRIC.label(),
        format_metric_value(p.x, X_METRIC),
        Y_METRIC.label(),
        format_metric_value(p.y, Y_METRIC),
        SIZE_METRIC.label(),
        format_metric_value(p.size, SIZE_METRIC),
    )
}

/// The bubble of `country` closest to `pos`, which is in log10 plot space.
fn nearest_bubble<'a>(
    scatter: &'a ScatterSeries,
    country: &str,
    pos: &PlotPoint,
) -> Option<&'a ScatterPoint> {
    let dist = |p: &ScatterPoint| (p.x.log10() - pos.x).powi(2) + (p.y.log10() - pos.y).powi(2);
    scatter
        .points
        .iter()
        .filter(|p| p.country == country)
        .min_by(|a, b| dist(a).total_cmp(&dist(b)))
}

fn sector_title(sector: &str) -> &str {
    if sector == ALL_SECTORS {
        "All Tech Sectors"
    } else {
        sector
    }
}

// ---------------------------------------------------------------------------
// Bar chart – one year, one bar per country
// ---------------------------------------------------------------------------

pub fn bar_chart(ui: &mut Ui, bar: &BarSeries, colors: &CountryColors, height: f32) {
    ui.label(
        RichText::new(format!("{} ({})", sector_title(&bar.tech_sector), bar.year)).strong(),
    );
    let Some(y_max) = bar.y_max else {
        no_data(ui, height);
        return;
    };

    let currency = bar.metric.is_currency();
    let (metric, year) = (bar.metric, bar.year);
    let countries: Vec<String> = bar.points.iter().map(|p| p.country.clone()).collect();

    Plot::new("bar_chart")
        .height(height)
        .legend(Legend::default())
        .y_axis_label(bar.metric.label())
        .include_y(0.0)
        .include_y(y_max)
        .include_x(-0.5)
        .include_x(bar.points.len() as f64 - 0.5)
        .x_axis_formatter(move |mark: GridMark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            countries.get(idx as usize).cloned().unwrap_or_default()
        })
        .y_axis_formatter(move |mark: GridMark, _range| format_compact(mark.value, currency))
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            for (i, p) in bar.points.iter().enumerate() {
                let color = colors.color_for(&p.country);
                let chart = BarChart::new(vec![Bar::new(i as f64, p.value)
                    .width(0.6)
                    .fill(color)
                    .name(&p.country)])
                .name(&p.country)
                .color(color)
                .element_formatter(Box::new(move |b: &Bar, _chart: &BarChart| {
                    value_label(&b.name, year, metric, b.value)
                }));
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Line chart – yearly averages per country
// ---------------------------------------------------------------------------

pub fn line_chart(ui: &mut Ui, line: &LineSeries, colors: &CountryColors, height: f32) {
    ui.label(RichText::new(format!("{} over time", line.metric.label())).strong());
    let Some(y_domain) = line.y_domain else {
        no_data(ui, height);
        return;
    };

    let currency = line.metric.is_currency();
    let metric = line.metric;

    Plot::new("line_chart")
        .height(height)
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label(line.metric.label())
        .include_x(line.x_domain.min)
        .include_x(line.x_domain.max)
        .include_y(y_domain.min)
        .include_y(y_domain.max)
        .x_axis_formatter(|mark: GridMark, _range| {
            if mark.value.fract().abs() < 1e-6 {
                format!("{:.0}", mark.value)
            } else {
                String::new()
            }
        })
        .y_axis_formatter(move |mark: GridMark, _range| format_compact(mark.value, currency))
        .label_formatter(move |name: &str, point: &PlotPoint| {
            if name.is_empty() {
                return String::new();
            }
            value_label(name, point.x.round() as i32, metric, point.y)
        })
        .allow_boxed_zoom(true)
        .show(ui, |plot_ui| {
            for series in &line.series {
                let color = colors.color_for(&series.country);
                let coords: Vec<[f64; 2]> = series
                    .points
                    .iter()
                    .map(|p| [p.year as f64, p.value])
                    .collect();

                plot_ui.line(
                    Line::new(PlotPoints::from(coords.clone()))
                        .name(&series.country)
                        .color(color)
                        .width(2.0),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(coords))
                        .name(&series.country)
                        .color(color)
                        .radius(3.5),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Scatter – R&D investment vs patents, bubble size from exports
// ---------------------------------------------------------------------------

/// Plotted in log10 space; axis labels show the original magnitudes.
pub fn scatter_plot(
    ui: &mut Ui,
    scatter: &ScatterSeries,
    colors: &CountryColors,
    radius_range: [f32; 2],
    height: f32,
) {
    ui.label(RichText::new("R&D Investment vs Patents Filed").strong());
    let (Some(x_domain), Some(y_domain)) = (scatter.x_domain, scatter.y_domain) else {
        no_data(ui, height);
        return;
    };

    let radius_range = [radius_range[0] as f64, radius_range[1] as f64];

    Plot::new("scatter_plot")
        .height(height)
        .legend(Legend::default())
        .x_axis_label("R&D Investment (USD, log)")
        .y_axis_label("Patents Filed (Annual, log)")
        .include_x(x_domain.min.log10())
        .include_x(x_domain.max.log10())
        .include_y(y_domain.min.log10())
        .include_y(y_domain.max.log10())
        .x_axis_formatter(|mark: GridMark, _range| {
            format_compact(10f64.powf(mark.value), X_METRIC.is_currency())
        })
        .y_axis_formatter(|mark: GridMark, _range| {
            format_compact(10f64.powf(mark.value), Y_METRIC.is_currency())
        })
        .label_formatter(|name: &str, point: &PlotPoint| {
            nearest_bubble(scatter, name, point)
                .map(bubble_label)
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            for p in &scatter.points {
                let radius = scatter
                    .size_domain
                    .map(|d| d.map_linear(p.size, radius_range))
                    .unwrap_or((radius_range[0] + radius_range[1]) / 2.0);
                plot_ui.points(
                    Points::new(PlotPoints::from(vec![[p.x.log10(), p.y.log10()]]))
                        .name(&p.country)
                        .color(colors.color_for(&p.country).gamma_multiply(0.7))
                        .radius(radius as f32),
                );
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::Domain;

    fn bubble(country: &str, year: i32, x: f64, y: f64) -> ScatterPoint {
        ScatterPoint {
            country: country.into(),
            year,
            tech_sector: "AI".into(),
            x,
            y,
            size: 2.5e9,
        }
    }

    #[test]
    fn value_label_formats_the_metric() {
        assert_eq!(
            value_label("China", 2020, Metric::TechExports, 1234.5),
            "China (2020)\nTech Exports (in USD): $1,234.50"
        );
        assert_eq!(
            value_label("Japan", 2019, Metric::MarketShare, 12.3456),
            "Japan (2019)\nMarket Share (%): 12.3456"
        );
    }

    #[test]
    fn hover_resolves_the_bubble_in_log_space() {
        let scatter = ScatterSeries {
            points: vec![
                bubble("China", 2019, 1e9, 500.0),
                bubble("Japan", 2019, 1e9, 500.0),
                bubble("China", 2020, 1e10, 5000.0),
            ],
            x_domain: Some(Domain::new(8e8, 1.2e10)),
            y_domain: Some(Domain::new(400.0, 6000.0)),
            size_domain: Some(Domain::new(2.5e9, 2.5e9)),
        };

        let hit = nearest_bubble(&scatter, "China", &PlotPoint::new(9.95, 3.68)).unwrap();
        assert_eq!(hit.year, 2020);
        let hit = nearest_bubble(&scatter, "Japan", &PlotPoint::new(9.95, 3.68)).unwrap();
        assert_eq!(hit.year, 2019);
        assert!(nearest_bubble(&scatter, "", &PlotPoint::new(9.0, 2.7)).is_none());

        let text = bubble_label(&scatter.points[0]);
        assert!(text.starts_with("China (2019)\nSector: AI\n"));
        assert!(text.contains("R&D Investment (in USD): $1,000,000,000.00"));
        assert!(text.contains("Number of Patents Filed (Annual): 500"));
        assert!(text.contains("Tech Exports (in USD): $2,500,000,000.00"));
    }
}
