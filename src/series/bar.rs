use crate::data::aggregate::average_by_country;
use crate::data::error::DashboardError;
use crate::data::filter::{FilterScope, YearScope};
use crate::data::model::{AggregatedPoint, Metric, Record};

/// Headroom above the tallest bar.
const Y_HEADROOM: f64 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarQuery<'a> {
    pub metric: Metric,
    pub tech_sector: &'a str,
    pub year: i32,
}

/// Per-country averages for one year.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub metric: Metric,
    pub tech_sector: String,
    pub year: i32,
    /// Countries in order of first appearance in the store.
    pub points: Vec<AggregatedPoint>,
    /// Top of the value axis; `None` when there are no points.
    pub y_max: Option<f64>,
}

impl BarSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

pub fn build_bar_series(records: &[Record], query: &BarQuery) -> Result<BarSeries, DashboardError> {
    let scope = FilterScope {
        tech_sector: query.tech_sector,
        years: YearScope::Single(query.year),
    };
    let filtered = scope.apply(records);
    let points = average_by_country(&filtered, query.metric)?;

    let y_max = points
        .iter()
        .map(|p| p.value)
        .reduce(f64::max)
        .map(|max| if max > 0.0 { max * Y_HEADROOM } else { 1.0 });

    Ok(BarSeries {
        metric: query.metric,
        tech_sector: query.tech_sector.to_string(),
        year: query.year,
        points,
        y_max,
    })
}
