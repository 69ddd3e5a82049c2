use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::error::DashboardError;

/// Sector sentinel meaning "no sector filter".
pub const ALL_SECTORS: &str = "All";

// ---------------------------------------------------------------------------
// Metric – the closed set of numeric columns
// ---------------------------------------------------------------------------

/// A numeric column of the dataset. The label is the exact column header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    MarketShare,
    RdInvestment,
    PatentsFiled,
    TechExports,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::MarketShare,
        Metric::RdInvestment,
        Metric::PatentsFiled,
        Metric::TechExports,
    ];

    /// Column header used in the source files.
    pub fn label(self) -> &'static str {
        match self {
            Metric::MarketShare => "Market Share (%)",
            Metric::RdInvestment => "R&D Investment (in USD)",
            Metric::PatentsFiled => "Number of Patents Filed (Annual)",
            Metric::TechExports => "Tech Exports (in USD)",
        }
    }

    pub fn from_label(label: &str) -> Option<Metric> {
        Metric::ALL.into_iter().find(|m| m.label() == label)
    }

    /// Whether values are monetary amounts (formatted as dollars).
    pub fn is_currency(self) -> bool {
        self.label().contains("USD")
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the dataset
// ---------------------------------------------------------------------------

/// One dataset row. Never mutated after ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub country: String,
    pub year: i32,
    pub tech_sector: String,
    /// Metrics present on this row. A metric missing from the source is absent here.
    pub metrics: BTreeMap<Metric, f64>,
}

impl Record {
    /// Value of `metric`, or [`DashboardError::MissingMetric`] when the row lacks it.
    pub fn metric(&self, metric: Metric) -> Result<f64, DashboardError> {
        self.metrics
            .get(&metric)
            .copied()
            .ok_or_else(|| DashboardError::MissingMetric {
                metric,
                country: self.country.clone(),
                year: self.year,
            })
    }
}

// ---------------------------------------------------------------------------
// TechDataset – the record store
// ---------------------------------------------------------------------------

/// The loaded record store with pre-computed dimension indices.
#[derive(Debug, Clone, Default)]
pub struct TechDataset {
    pub records: Vec<Record>,
    /// Distinct years, ascending.
    pub years: Vec<i32>,
    /// Distinct tech sectors, sorted.
    pub tech_sectors: Vec<String>,
    /// Distinct countries in order of first appearance.
    pub countries: Vec<String>,
}

impl TechDataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut years = BTreeSet::new();
        let mut sectors = BTreeSet::new();
        let mut countries: Vec<String> = Vec::new();

        for rec in &records {
            years.insert(rec.year);
            sectors.insert(rec.tech_sector.clone());
            if !countries.contains(&rec.country) {
                countries.push(rec.country.clone());
            }
        }

        TechDataset {
            records,
            years: years.into_iter().collect(),
            tech_sectors: sectors.into_iter().collect(),
            countries,
        }
    }

    /// `(min, max)` year, `None` for an empty store.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        Some((*self.years.first()?, *self.years.last()?))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Aggregation outputs
// ---------------------------------------------------------------------------

/// One averaged metric value for a country.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedPoint {
    pub country: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearValue {
    pub year: i32,
    pub value: f64,
}

/// Per-year averages for one country, ascending by year.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    pub country: String,
    pub points: Vec<YearValue>,
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Build a record carrying a single metric.
    pub fn record(country: &str, year: i32, sector: &str, metric: Metric, value: f64) -> Record {
        Record {
            country: country.to_string(),
            year,
            tech_sector: sector.to_string(),
            metrics: BTreeMap::from([(metric, value)]),
        }
    }

    /// Build a record carrying all four metrics.
    pub fn full_record(
        country: &str,
        year: i32,
        sector: &str,
        [share, rd, patents, exports]: [f64; 4],
    ) -> Record {
        Record {
            country: country.to_string(),
            year,
            tech_sector: sector.to_string(),
            metrics: BTreeMap::from([
                (Metric::MarketShare, share),
                (Metric::RdInvestment, rd),
                (Metric::PatentsFiled, patents),
                (Metric::TechExports, exports),
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::record;
    use super::*;

    #[test]
    fn metric_labels_round_trip() {
        for m in Metric::ALL {
            assert_eq!(Metric::from_label(m.label()), Some(m));
        }
        assert_eq!(Metric::from_label("market share"), None);
    }

    #[test]
    fn currency_metrics() {
        assert!(Metric::RdInvestment.is_currency());
        assert!(Metric::TechExports.is_currency());
        assert!(!Metric::MarketShare.is_currency());
        assert!(!Metric::PatentsFiled.is_currency());
    }

    #[test]
    fn missing_metric_is_reported() {
        let r = record("China", 2020, "AI", Metric::MarketShare, 40.0);
        assert_eq!(r.metric(Metric::MarketShare).ok(), Some(40.0));
        let err = r.metric(Metric::TechExports).unwrap_err();
        assert_eq!(
            err,
            DashboardError::MissingMetric {
                metric: Metric::TechExports,
                country: "China".into(),
                year: 2020,
            }
        );
    }

    #[test]
    fn dataset_indices() {
        let ds = TechDataset::from_records(vec![
            record("Japan", 2021, "Robotics", Metric::MarketShare, 1.0),
            record("China", 2019, "AI", Metric::MarketShare, 2.0),
            record("Japan", 2019, "AI", Metric::MarketShare, 3.0),
        ]);
        assert_eq!(ds.years, vec![2019, 2021]);
        assert_eq!(ds.tech_sectors, vec!["AI".to_string(), "Robotics".to_string()]);
        assert_eq!(ds.countries, vec!["Japan".to_string(), "China".to_string()]);
        assert_eq!(ds.year_bounds(), Some((2019, 2021)));
        assert_eq!(TechDataset::default().year_bounds(), None);
    }
}
