use crate::data::error::DashboardError;
use crate::data::filter::{FilterScope, YearRange, YearScope};
use crate::data::model::{Metric, Record};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableQuery<'a> {
    pub metric: Metric,
    pub tech_sector: &'a str,
    pub years: YearRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub country: String,
    pub year: i32,
    pub tech_sector: String,
    /// Raw value of the selected metric; formatting happens in the view.
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableSeries {
    pub metric: Metric,
    /// Sorted by year, then country (byte order).
    pub rows: Vec<TableRow>,
}

impl TableSeries {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn build_table_series(records: &[Record], query: &TableQuery) -> Result<TableSeries, DashboardError> {
    let scope = FilterScope {
        tech_sector: query.tech_sector,
        years: YearScope::Range(query.years),
    };

    let mut rows = scope
        .apply(records)
        .into_iter()
        .map(|rec| {
            Ok(TableRow {
                country: rec.country.clone(),
                year: rec.year,
                tech_sector: rec.tech_sector.clone(),
                value: rec.metric(query.metric)?,
            })
        })
        .collect::<Result<Vec<_>, DashboardError>>()?;

    rows.sort_by(|a, b| a.year.cmp(&b.year).then_with(|| a.country.cmp(&b.country)));

    Ok(TableSeries {
        metric: query.metric,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::test_support::record;
    use crate::data::model::ALL_SECTORS;

    fn query(metric: Metric, sector: &str, start: i32, end: i32) -> TableQuery<'_> {
        TableQuery {
            metric,
            tech_sector: sector,
            years: YearRange::new(start, end).unwrap(),
        }
    }

    #[test]
    fn sorted_by_year_then_country() {
        let records = vec![
            record("China", 2020, "AI", Metric::MarketShare, 3.0),
            record("Japan", 2019, "AI", Metric::MarketShare, 1.0),
            record("China", 2019, "AI", Metric::MarketShare, 2.0),
        ];
        let table =
            build_table_series(&records, &query(Metric::MarketShare, ALL_SECTORS, 2019, 2020))
                .unwrap();
        let order: Vec<(i32, &str)> =
            table.rows.iter().map(|r| (r.year, r.country.as_str())).collect();
        assert_eq!(order, vec![(2019, "China"), (2019, "Japan"), (2020, "China")]);
        assert_eq!(table.rows[0].value, 2.0);
    }

    #[test]
    fn country_order_is_case_sensitive() {
        let records = vec![
            record("china", 2020, "AI", Metric::MarketShare, 1.0),
            record("Japan", 2020, "AI", Metric::MarketShare, 1.0),
        ];
        let table =
            build_table_series(&records, &query(Metric::MarketShare, ALL_SECTORS, 2020, 2020))
                .unwrap();
        assert_eq!(table.rows[0].country, "Japan");
    }

    #[test]
    fn selects_the_requested_metric_and_sector() {
        let mut rec = record("China", 2020, "AI", Metric::MarketShare, 3.0);
        rec.metrics.insert(Metric::TechExports, 1_500.0);
        let records = vec![rec, record("China", 2020, "Robotics", Metric::TechExports, 9.0)];

        let table =
            build_table_series(&records, &query(Metric::TechExports, "AI", 2020, 2020)).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].tech_sector, "AI");
        assert_eq!(table.rows[0].value, 1_500.0);
        assert_eq!(table.metric, Metric::TechExports);
    }

    #[test]
    fn empty_selection_is_empty_table() {
        let records = vec![record("China", 2020, "AI", Metric::MarketShare, 3.0)];
        let table =
            build_table_series(&records, &query(Metric::MarketShare, "Robotics", 2020, 2020))
                .unwrap();
        assert!(table.is_empty());
    }
}
