use super::Domain;
use crate::data::error::DashboardError;
use crate::data::filter::{FilterScope, YearRange, YearScope};
use crate::data::model::{Metric, Record};

/// Smallest value allowed on a log axis.
const LOG_FLOOR: f64 = 1.0;
const LOWER_MARGIN: f64 = 0.8;
const UPPER_MARGIN: f64 = 1.2;

pub const X_METRIC: Metric = Metric::RdInvestment;
pub const Y_METRIC: Metric = Metric::PatentsFiled;
pub const SIZE_METRIC: Metric = Metric::TechExports;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterQuery<'a> {
    pub tech_sector: &'a str,
    pub years: YearRange,
}

/// One record as a bubble.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub country: String,
    pub year: i32,
    pub tech_sector: String,
    /// R&D investment, floored to 1.
    pub x: f64,
    /// Patents filed, floored to 1.
    pub y: f64,
    /// Tech exports, unfloored; drives the bubble radius.
    pub size: f64,
}

/// R&D investment vs patents filed, one point per record.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub points: Vec<ScatterPoint>,
    /// Log-axis extents; `None` when empty.
    pub x_domain: Option<Domain>,
    pub y_domain: Option<Domain>,
    /// Input extent for the radius mapping.
    pub size_domain: Option<Domain>,
}

impl ScatterSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

pub fn build_scatter_series(
    records: &[Record],
    query: &ScatterQuery,
) -> Result<ScatterSeries, DashboardError> {
    let scope = FilterScope {
        tech_sector: query.tech_sector,
        years: YearScope::Range(query.years),
    };

    let points = scope
        .apply(records)
        .into_iter()
        .map(|rec| {
            Ok(ScatterPoint {
                country: rec.country.clone(),
                year: rec.year,
                tech_sector: rec.tech_sector.clone(),
                x: log_safe(rec.metric(X_METRIC)?),
                y: log_safe(rec.metric(Y_METRIC)?),
                size: rec.metric(SIZE_METRIC)?,
            })
        })
        .collect::<Result<Vec<_>, DashboardError>>()?;

    Ok(ScatterSeries {
        x_domain: Domain::of(points.iter().map(|p| p.x)).map(log_margins),
        y_domain: Domain::of(points.iter().map(|p| p.y)).map(log_margins),
        size_domain: Domain::of(points.iter().map(|p| p.size)),
        points,
    })
}

/// Clamp a value onto the positive axis of a log scale.
pub fn log_safe(value: f64) -> f64 {
    value.max(LOG_FLOOR)
}

fn log_margins(extent: Domain) -> Domain {
    Domain::new(extent.min * LOWER_MARGIN, extent.max * UPPER_MARGIN)
}
