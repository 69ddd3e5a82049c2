/// Series builders: pure transforms from the record store to plot-ready data.
///
/// ```text
///   &[Record] + query
///        │
///        ▼
///   ┌──────────┐     ┌───────────┐
///   │  filter   │ ──▶ │ aggregate │   (bar, line only)
///   └──────────┘     └───────────┘
///        │                 │
///        ▼                 ▼
///   BarSeries / LineSeries / ScatterSeries / TableSeries
/// ```
///
/// An empty selection produces a series with no points and `None` domains;
/// it never produces NaN bounds.

pub mod bar;
pub mod line;
pub mod scatter;
pub mod table;

pub use bar::{BarQuery, BarSeries, build_bar_series};
pub use line::{LineQuery, LineSeries, build_line_series};
pub use scatter::{ScatterQuery, ScatterSeries, build_scatter_series};
pub use table::{TableQuery, TableSeries, build_table_series};

use crate::data::error::DashboardError;
use crate::data::model::Record;
use crate::state::DashboardState;

// ---------------------------------------------------------------------------
// Domain – an axis or mapping extent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    pub fn new(min: f64, max: f64) -> Self {
        Domain { min, max }
    }

    /// Extent of `values`, `None` when there are none.
    pub fn of(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().fold(None, |acc, v| match acc {
            None => Some(Domain::new(v, v)),
            Some(d) => Some(Domain::new(d.min.min(v), d.max.max(v))),
        })
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Linear map of `value` from this domain onto `range`.
    /// A zero-width domain maps everything to the middle of `range`.
    pub fn map_linear(&self, value: f64, range: [f64; 2]) -> f64 {
        let span = self.span();
        if span.abs() < f64::EPSILON {
            return (range[0] + range[1]) / 2.0;
        }
        range[0] + (value - self.min) / span * (range[1] - range[0])
    }
}

// ---------------------------------------------------------------------------
// ChartSet – the four views' inputs, built together
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSet {
    pub bar: BarSeries,
    pub line: LineSeries,
    pub scatter: ScatterSeries,
    pub table: TableSeries,
}

/// Build every chart for `state`.
pub fn build_all(records: &[Record], state: &DashboardState) -> Result<ChartSet, DashboardError> {
    let charts = ChartSet {
        bar: build_bar_series(records, &state.bar_query())?,
        line: build_line_series(records, &state.line_query())?,
        scatter: build_scatter_series(records, &state.scatter_query())?,
        table: build_table_series(records, &state.table_query())?,
    };
    if charts.table.is_empty() {
        log::warn!(
            "no records for sector '{}' in {}..={}",
            state.tech_sector(),
            state.start_year(),
            state.end_year()
        );
    }
    Ok(charts)
}
