use super::Domain;
use crate::data::aggregate::average_by_country_and_year;
use crate::data::error::DashboardError;
use crate::data::filter::{FilterScope, YearRange, YearScope};
use crate::data::model::{Metric, Record, TimeSeries};

/// Fraction of the value spread added above and below the data.
const Y_PADDING: f64 = 0.1;
/// Half-width given to a value axis whose data has no spread.
const FLAT_EPSILON: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineQuery<'a> {
    pub metric: Metric,
    pub tech_sector: &'a str,
    pub years: YearRange,
}

/// Yearly averages per country over a year range.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub metric: Metric,
    pub series: Vec<TimeSeries>,
    /// Always exactly the queried range.
    pub x_domain: Domain,
    /// `None` when no point survived the filters.
    pub y_domain: Option<Domain>,
}

impl LineSeries {
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }
}

pub fn build_line_series(records: &[Record], query: &LineQuery) -> Result<LineSeries, DashboardError> {
    let scope = FilterScope {
        tech_sector: query.tech_sector,
        years: YearScope::Range(query.years),
    };
    let filtered = scope.apply(records);
    let series = average_by_country_and_year(&filtered, query.metric)?;

    let values = series.iter().flat_map(|s| s.points.iter().map(|p| p.value));
    let y_domain = Domain::of(values).map(padded);

    Ok(LineSeries {
        metric: query.metric,
        series,
        x_domain: Domain::new(query.years.start() as f64, query.years.end() as f64),
        y_domain,
    })
}

/// Pad by 10% of the spread, never below zero; widen flat data by [`FLAT_EPSILON`].
fn padded(extent: Domain) -> Domain {
    let pad = extent.span() * Y_PADDING;
    let (lo, hi) = if pad > 0.0 {
        (extent.min - pad, extent.max + pad)
    } else {
        (extent.min - FLAT_EPSILON, extent.max + FLAT_EPSILON)
    };
    Domain::new(lo.max(0.0), hi)
}
