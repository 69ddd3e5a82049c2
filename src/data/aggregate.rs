use std::collections::HashMap;
use std::hash::Hash;

use super::error::DashboardError;
use super::model::{AggregatedPoint, Metric, Record, TimeSeries, YearValue};

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Group `records` by `key`, keeping groups in order of first appearance.
pub fn group_by<'r, K, F>(records: &[&'r Record], key: F) -> Vec<(K, Vec<&'r Record>)>
where
    K: Eq + Hash + Clone,
    F: Fn(&Record) -> K,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&'r Record>)> = Vec::new();

    for &rec in records {
        let k = key(rec);
        match slots.get(&k) {
            Some(&i) => groups[i].1.push(rec),
            None => {
                slots.insert(k.clone(), groups.len());
                groups.push((k, vec![rec]));
            }
        }
    }
    groups
}

/// Arithmetic mean of `metric` over a non-empty group.
pub fn mean(records: &[&Record], metric: Metric) -> Result<f64, DashboardError> {
    let mut sum = 0.0;
    for rec in records {
        sum += rec.metric(metric)?;
    }
    Ok(sum / records.len() as f64)
}

/// Group by `key` and average `metric` per group, in first-appearance order.
///
/// Empty input yields an empty list. Any record lacking `metric` fails the
/// whole pass with [`DashboardError::MissingMetric`].
pub fn group_and_average<K, F>(
    records: &[&Record],
    key: F,
    metric: Metric,
) -> Result<Vec<(K, f64)>, DashboardError>
where
    K: Eq + Hash + Clone,
    F: Fn(&Record) -> K,
{
    group_by(records, key)
        .into_iter()
        .map(|(k, group)| Ok::<_, DashboardError>((k, mean(&group, metric)?)))
        .collect()
}

/// One averaged value per country.
pub fn average_by_country(
    records: &[&Record],
    metric: Metric,
) -> Result<Vec<AggregatedPoint>, DashboardError> {
    Ok(group_and_average(records, |r| r.country.clone(), metric)?
        .into_iter()
        .map(|(country, value)| AggregatedPoint { country, value })
        .collect())
}

/// Country → year → mean. Countries keep first-appearance order; each
/// country's points are sorted ascending by year.
pub fn average_by_country_and_year(
    records: &[&Record],
    metric: Metric,
) -> Result<Vec<TimeSeries>, DashboardError> {
    group_by(records, |r| r.country.clone())
        .into_iter()
        .map(|(country, rows)| {
            let mut points: Vec<YearValue> = group_and_average(&rows, |r| r.year, metric)?
                .into_iter()
                .map(|(year, value)| YearValue { year, value })
                .collect();
            points.sort_by_key(|p| p.year);
            Ok::<_, DashboardError>(TimeSeries { country, points })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::data::model::test_support::record;

    #[test]
    fn mean_of_two_values() {
        let records = [
            record("China", 2020, "AI", Metric::MarketShare, 10.0),
            record("China", 2020, "Robotics", Metric::MarketShare, 20.0),
        ];
        let refs: Vec<&Record> = records.iter().collect();
        let points = average_by_country(&refs, Metric::MarketShare).unwrap();
        assert_eq!(
            points,
            vec![AggregatedPoint { country: "China".into(), value: 15.0 }]
        );
    }

    #[test]
    fn groups_follow_first_appearance() {
        let records = [
            record("Japan", 2020, "AI", Metric::MarketShare, 1.0),
            record("China", 2020, "AI", Metric::MarketShare, 2.0),
            record("Japan", 2021, "AI", Metric::MarketShare, 3.0),
        ];
        let refs: Vec<&Record> = records.iter().collect();
        let points = average_by_country(&refs, Metric::MarketShare).unwrap();
        let countries: Vec<&str> = points.iter().map(|p| p.country.as_str()).collect();
        assert_eq!(countries, vec!["Japan", "China"]);
        assert_eq!(points[0].value, 2.0);
    }

    #[test]
    fn empty_input_gives_no_points() {
        let points = average_by_country(&[], Metric::MarketShare).unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn missing_metric_fails_the_pass() {
        let records = [
            record("China", 2020, "AI", Metric::MarketShare, 1.0),
            record("China", 2020, "AI", Metric::PatentsFiled, 7.0),
        ];
        let refs: Vec<&Record> = records.iter().collect();
        let err = average_by_country(&refs, Metric::MarketShare).unwrap_err();
        assert!(matches!(err, DashboardError::MissingMetric { year: 2020, .. }));
    }

    #[test]
    fn yearly_series_are_sorted_by_year() {
        let records = [
            record("China", 2022, "AI", Metric::MarketShare, 30.0),
            record("China", 2020, "AI", Metric::MarketShare, 10.0),
            record("China", 2020, "Robotics", Metric::MarketShare, 20.0),
            record("Japan", 2021, "AI", Metric::MarketShare, 5.0),
        ];
        let refs: Vec<&Record> = records.iter().collect();
        let series = average_by_country_and_year(&refs, Metric::MarketShare).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].country, "China");
        assert_eq!(
            series[0].points,
            vec![
                YearValue { year: 2020, value: 15.0 },
                YearValue { year: 2022, value: 30.0 },
            ]
        );
        assert_eq!(series[1].points, vec![YearValue { year: 2021, value: 5.0 }]);
    }

    proptest! {
        #[test]
        fn one_point_per_distinct_key(
            rows in prop::collection::vec((0usize..4, 0i32..50), 1..30)
        ) {
            let names = ["China", "Japan", "Korea", "India"];
            let records: Vec<Record> = rows
                .iter()
                .map(|&(c, v)| record(names[c], 2020, "AI", Metric::MarketShare, v as f64))
                .collect();
            let refs: Vec<&Record> = records.iter().collect();
            let points = average_by_country(&refs, Metric::MarketShare).unwrap();

            let mut distinct: Vec<usize> = rows.iter().map(|&(c, _)| c).collect();
            distinct.sort_unstable();
            distinct.dedup();
            prop_assert_eq!(points.len(), distinct.len());

            for p in &points {
                let vals: Vec<f64> = records
                    .iter()
                    .filter(|r| r.country == p.country)
                    .map(|r| r.metrics[&Metric::MarketShare])
                    .collect();
                let expected = vals.iter().sum::<f64>() / vals.len() as f64;
                prop_assert_eq!(p.value, expected);
            }
        }

        #[test]
        fn series_years_strictly_ascend(
            rows in prop::collection::vec((0usize..2, 2000i32..2010, 0i32..100), 0..40)
        ) {
            let names = ["China", "Japan"];
            let records: Vec<Record> = rows
                .iter()
                .map(|&(c, y, v)| record(names[c], y, "AI", Metric::MarketShare, v as f64))
                .collect();
            let refs: Vec<&Record> = records.iter().collect();
            for s in average_by_country_and_year(&refs, Metric::MarketShare).unwrap() {
                for pair in s.points.windows(2) {
                    prop_assert!(pair[0].year < pair[1].year);
                }
            }
        }
    }
}
