use std::path::Path;

use crate::color::CountryColors;
use crate::config::DashboardConfig;
use crate::data::error::DashboardError;
use crate::data::filter::YearRange;
use crate::data::loader::load_file;
use crate::data::model::{Metric, TechDataset};
use crate::series::{
    self, BarQuery, ChartSet, LineQuery, ScatterQuery, TableQuery,
};

// ---------------------------------------------------------------------------
// Dashboard selections
// ---------------------------------------------------------------------------

/// The current filter selections shared by all four charts.
///
/// `years` is always a valid range and `year` always lies inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    tech_sector: String,
    metric: Metric,
    years: YearRange,
    year: i32,
}

/// One user control change.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardInput {
    TechSector(String),
    Metric(Metric),
    StartYear(i32),
    EndYear(i32),
    /// The single-year slider.
    Year(i32),
}

/// Which charts a transition invalidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    All,
    BarOnly,
}

impl DashboardState {
    pub fn new(
        tech_sector: impl Into<String>,
        metric: Metric,
        start_year: i32,
        end_year: i32,
        year: i32,
    ) -> Result<Self, DashboardError> {
        let years = YearRange::new(start_year, end_year)?;
        check_in_range(year, years)?;
        Ok(Self {
            tech_sector: tech_sector.into(),
            metric,
            years,
            year,
        })
    }

    /// Full year span of the dataset, slider at the latest year.
    /// `None` when the dataset has no records.
    pub fn initial(
        dataset: &TechDataset,
        tech_sector: &str,
        metric: Metric,
    ) -> Option<Self> {
        let (first, last) = dataset.year_bounds()?;
        Self::new(tech_sector, metric, first, last, last).ok()
    }

    pub fn tech_sector(&self) -> &str {
        &self.tech_sector
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn start_year(&self) -> i32 {
        self.years.start()
    }

    pub fn end_year(&self) -> i32 {
        self.years.end()
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Bounds of the single-year slider; they follow the range.
    pub fn slider_bounds(&self) -> (i32, i32) {
        (self.years.start(), self.years.end())
    }

    /// Pure transition: the next state and which charts it invalidates.
    ///
    /// Moving one range end past the other drags the other end along, and the
    /// slider is pulled back into the new range. A slider value outside the
    /// range is rejected.
    pub fn apply(&self, input: DashboardInput) -> Result<(Self, Refresh), DashboardError> {
        let mut next = self.clone();
        let refresh = match input {
            DashboardInput::TechSector(sector) => {
                next.tech_sector = sector;
                Refresh::All
            }
            DashboardInput::Metric(metric) => {
                next.metric = metric;
                Refresh::All
            }
            DashboardInput::StartYear(start) => {
                let end = self.years.end().max(start);
                next.years = YearRange::new(start, end)?;
                next.year = next.years.clamp(self.year);
                Refresh::All
            }
            DashboardInput::EndYear(end) => {
                let start = self.years.start().min(end);
                next.years = YearRange::new(start, end)?;
                next.year = next.years.clamp(self.year);
                Refresh::All
            }
            DashboardInput::Year(year) => {
                check_in_range(year, self.years)?;
                next.year = year;
                Refresh::BarOnly
            }
        };
        Ok((next, refresh))
    }

    pub fn bar_query(&self) -> BarQuery<'_> {
        BarQuery {
            metric: self.metric,
            tech_sector: &self.tech_sector,
            year: self.year,
        }
    }

    pub fn line_query(&self) -> LineQuery<'_> {
        LineQuery {
            metric: self.metric,
            tech_sector: &self.tech_sector,
            years: self.years,
        }
    }

    pub fn scatter_query(&self) -> ScatterQuery<'_> {
        ScatterQuery {
            tech_sector: &self.tech_sector,
            years: self.years,
        }
    }

    pub fn table_query(&self) -> TableQuery<'_> {
        TableQuery {
            metric: self.metric,
            tech_sector: &self.tech_sector,
            years: self.years,
        }
    }
}

fn check_in_range(year: i32, years: YearRange) -> Result<(), DashboardError> {
    if years.contains(year) {
        Ok(())
    } else {
        Err(DashboardError::YearOutOfRange {
            year,
            start: years.start(),
            end: years.end(),
        })
    }
}

// ---------------------------------------------------------------------------
// Dashboard controller
// ---------------------------------------------------------------------------

/// Owns the record store, the selections and the last built charts.
///
/// Each input is applied as one step: the charts are rebuilt from the
/// candidate state first, and the state is only committed if that succeeds.
#[derive(Debug, Clone)]
pub struct Dashboard {
    dataset: TechDataset,
    state: DashboardState,
    charts: ChartSet,
}

impl Dashboard {
    pub fn new(dataset: TechDataset, state: DashboardState) -> Result<Self, DashboardError> {
        let charts = series::build_all(&dataset.records, &state)?;
        Ok(Self {
            dataset,
            state,
            charts,
        })
    }

    pub fn dataset(&self) -> &TechDataset {
        &self.dataset
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn charts(&self) -> &ChartSet {
        &self.charts
    }

    pub fn set_tech_sector(&mut self, sector: impl Into<String>) -> Result<&ChartSet, DashboardError> {
        self.dispatch(DashboardInput::TechSector(sector.into()))
    }

    pub fn set_metric(&mut self, metric: Metric) -> Result<&ChartSet, DashboardError> {
        self.dispatch(DashboardInput::Metric(metric))
    }

    pub fn set_start_year(&mut self, year: i32) -> Result<&ChartSet, DashboardError> {
        self.dispatch(DashboardInput::StartYear(year))
    }

    pub fn set_end_year(&mut self, year: i32) -> Result<&ChartSet, DashboardError> {
        self.dispatch(DashboardInput::EndYear(year))
    }

    pub fn set_year(&mut self, year: i32) -> Result<&ChartSet, DashboardError> {
        self.dispatch(DashboardInput::Year(year))
    }

    pub fn dispatch(&mut self, input: DashboardInput) -> Result<&ChartSet, DashboardError> {
        log::debug!("dashboard input: {input:?}");
        let (next, refresh) = self.state.apply(input)?;

        let records = &self.dataset.records;
        let charts = match refresh {
            Refresh::All => series::build_all(records, &next)?,
            Refresh::BarOnly => ChartSet {
                bar: series::build_bar_series(records, &next.bar_query())?,
                ..self.charts.clone()
            },
        };
        log::debug!(
            "recomputed {refresh:?}: sector={} metric={} years={}..={} year={}",
            next.tech_sector(),
            next.metric(),
            next.start_year(),
            next.end_year(),
            next.year()
        );

        self.state = next;
        self.charts = charts;
        Ok(&self.charts)
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded dashboard (None until a dataset is opened).
    pub dashboard: Option<Dashboard>,

    pub colors: CountryColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let colors = CountryColors::from_config(&config.country_colors);
        Self {
            config,
            dashboard: None,
            colors,
            status_message: None,
        }
    }

    /// Load a dataset file, reporting failures in the status bar.
    pub fn open(&mut self, path: &Path) {
        match load_file(path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Replace the record store and reset selections to its full extent.
    pub fn set_dataset(&mut self, dataset: TechDataset) {
        let metric = match self.config.metric() {
            Ok(m) => m,
            Err(e) => {
                log::warn!("{e}; using {}", Metric::MarketShare);
                Metric::MarketShare
            }
        };
        let Some(state) = DashboardState::initial(&dataset, &self.config.default_sector, metric)
        else {
            self.dashboard = None;
            self.status_message = Some("Dataset contains no records".to_string());
            return;
        };

        self.colors.register(&dataset.countries);
        match Dashboard::new(dataset, state) {
            Ok(dashboard) => {
                self.dashboard = Some(dashboard);
                self.status_message = None;
            }
            Err(e) => self.report(e),
        }
    }

    /// Feed a control change to the dashboard, surfacing any failure.
    pub fn apply(&mut self, input: DashboardInput) {
        let Some(dashboard) = self.dashboard.as_mut() else {
            return;
        };
        match dashboard.dispatch(input) {
            Ok(_) => self.status_message = None,
            Err(e) => self.report(e),
        }
    }

    fn report(&mut self, err: DashboardError) {
        log::error!("{err}");
        self.status_message = Some(format!("Error: {err}"));
    }
}
