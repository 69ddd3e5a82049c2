use thiserror::Error;

use super::model::Metric;

/// Failures raised by the filter, aggregation and state layers.
///
/// An empty selection is not an error: series builders report it through
/// their own empty outputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    #[error("record for {country} ({year}) has no value for '{metric}'")]
    MissingMetric {
        metric: Metric,
        country: String,
        year: i32,
    },

    #[error("invalid year range: start {start} is after end {end}")]
    InvalidRange { start: i32, end: i32 },

    #[error("year {year} lies outside the selected range {start}..={end}")]
    YearOutOfRange { year: i32, start: i32, end: i32 },

    #[error("unknown metric '{0}'")]
    UnknownMetric(String),
}
