use super::error::DashboardError;
use super::model::{Record, ALL_SECTORS};

// ---------------------------------------------------------------------------
// Year scopes
// ---------------------------------------------------------------------------

/// An inclusive `start..=end` year span. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    start: i32,
    end: i32,
}

impl YearRange {
    /// Fails with [`DashboardError::InvalidRange`] when `start > end`.
    pub fn new(start: i32, end: i32) -> Result<Self, DashboardError> {
        if start > end {
            return Err(DashboardError::InvalidRange { start, end });
        }
        Ok(YearRange { start, end })
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }

    /// Pull `year` into the range.
    pub fn clamp(&self, year: i32) -> i32 {
        year.clamp(self.start, self.end)
    }
}

/// Either a single year or an inclusive range of years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearScope {
    Single(i32),
    Range(YearRange),
}

/// The per-query narrowing of the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterScope<'a> {
    pub tech_sector: &'a str,
    pub years: YearScope,
}

impl FilterScope<'_> {
    /// Year filter first, then sector filter.
    pub fn apply<'r>(&self, records: impl IntoIterator<Item = &'r Record>) -> Vec<&'r Record> {
        let by_year = match self.years {
            YearScope::Single(year) => filter_by_year(records, year),
            YearScope::Range(range) => filter_by_year_range(records, range),
        };
        filter_by_sector(by_year, self.tech_sector)
    }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// Keep records of `tech_sector` (exact match). [`ALL_SECTORS`] keeps everything.
pub fn filter_by_sector<'r>(
    records: impl IntoIterator<Item = &'r Record>,
    tech_sector: &str,
) -> Vec<&'r Record> {
    if tech_sector == ALL_SECTORS {
        return records.into_iter().collect();
    }
    records
        .into_iter()
        .filter(|r| r.tech_sector == tech_sector)
        .collect()
}

pub fn filter_by_year<'r>(records: impl IntoIterator<Item = &'r Record>, year: i32) -> Vec<&'r Record> {
    records.into_iter().filter(|r| r.year == year).collect()
}

/// Keep records whose year lies in `range`, both bounds included.
pub fn filter_by_year_range<'r>(
    records: impl IntoIterator<Item = &'r Record>,
    range: YearRange,
) -> Vec<&'r Record> {
    records.into_iter().filter(|r| range.contains(r.year)).collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::data::model::test_support::record;
    use crate::data::model::Metric;

    fn sample() -> Vec<Record> {
        vec![
            record("China", 2014, "AI", Metric::MarketShare, 1.0),
            record("China", 2015, "AI", Metric::MarketShare, 2.0),
            record("Japan", 2016, "Robotics", Metric::MarketShare, 3.0),
            record("Japan", 2017, "AI", Metric::MarketShare, 4.0),
            record("China", 2018, "ai", Metric::MarketShare, 5.0),
        ]
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert_eq!(
            YearRange::new(2020, 2015),
            Err(DashboardError::InvalidRange { start: 2020, end: 2015 })
        );
        assert!(YearRange::new(2015, 2015).is_ok());
    }

    #[test]
    fn all_sectors_is_a_no_op() {
        let records = sample();
        let kept = filter_by_sector(&records, ALL_SECTORS);
        assert_eq!(kept, records.iter().collect::<Vec<_>>());
    }

    #[test]
    fn sector_match_is_exact() {
        let records = sample();
        let kept = filter_by_sector(&records, "AI");
        let years: Vec<i32> = kept.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2014, 2015, 2017]);
    }

    #[test]
    fn range_is_inclusive_at_both_bounds() {
        let records = sample();
        let kept = filter_by_year_range(&records, YearRange::new(2015, 2017).unwrap());
        let years: Vec<i32> = kept.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2015, 2016, 2017]);
    }

    #[test]
    fn single_year_is_exact() {
        let records = sample();
        let kept = filter_by_year(&records, 2016);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].country, "Japan");
        assert!(filter_by_year(&records, 1999).is_empty());
    }

    #[test]
    fn scope_composes_year_and_sector() {
        let records = sample();
        let scope = FilterScope {
            tech_sector: "AI",
            years: YearScope::Range(YearRange::new(2015, 2018).unwrap()),
        };
        let kept = scope.apply(&records);
        let years: Vec<i32> = kept.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2015, 2017]);

        // Reverse order of application gives the same subset.
        let by_sector = filter_by_sector(&records, "AI");
        let reversed = filter_by_year_range(by_sector, YearRange::new(2015, 2018).unwrap());
        assert_eq!(kept, reversed);
    }

    fn arb_records() -> impl Strategy<Value = Vec<Record>> {
        prop::collection::vec(
            (
                prop::sample::select(vec!["China", "Japan"]),
                2000i32..2010,
                prop::sample::select(vec!["AI", "Robotics", "Semiconductors"]),
                0.0f64..100.0,
            ),
            0..40,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .map(|(c, y, s, v)| record(c, y, s, Metric::MarketShare, v))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn filtering_is_idempotent(
            records in arb_records(),
            sector in prop::sample::select(vec!["All", "AI", "Robotics"]),
            start in 2000i32..2010,
            len in 0i32..5,
        ) {
            let range = YearRange::new(start, start + len).unwrap();
            let once = filter_by_year_range(filter_by_sector(&records, sector), range);
            let twice = filter_by_year_range(filter_by_sector(once.iter().copied(), sector), range);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn all_sectors_keeps_every_record(records in arb_records()) {
            let kept = filter_by_sector(&records, ALL_SECTORS);
            prop_assert_eq!(kept.len(), records.len());
            for (k, r) in kept.iter().zip(&records) {
                prop_assert!(std::ptr::eq(*k, r));
            }
        }

        #[test]
        fn range_bounds_are_honoured(records in arb_records(), start in 2001i32..2008, len in 0i32..3) {
            let range = YearRange::new(start, start + len).unwrap();
            let kept = filter_by_year_range(&records, range);
            for r in &records {
                let in_range = r.year >= start && r.year <= start + len;
                prop_assert_eq!(kept.iter().any(|k| std::ptr::eq(*k, r)), in_range);
            }
        }
    }
}
