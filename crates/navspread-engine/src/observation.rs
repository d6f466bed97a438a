//! Raw date-indexed input records.

use crate::error::{EngineError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day of fund and benchmark data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Trading date.
    pub date: NaiveDate,

    /// Fund net asset value.
    pub nav: f64,

    /// Outstanding units of the fund.
    pub shares: f64,

    /// Benchmark index level.
    pub benchmark: f64,
}

impl Observation {
    /// Create an observation from net asset value and shares outstanding.
    pub const fn new(date: NaiveDate, nav: f64, shares: f64, benchmark: f64) -> Self {
        Self {
            date,
            nav,
            shares,
            benchmark,
        }
    }

    /// Create an observation from an already divided per-unit fund value.
    ///
    /// The value is stored as `nav` against a single share so that
    /// [`Observation::unit_value`] returns it unchanged.
    pub const fn from_unit_value(date: NaiveDate, unit_value: f64, benchmark: f64) -> Self {
        Self::new(date, unit_value, 1.0, benchmark)
    }

    /// Net asset value per share.
    ///
    /// # Errors
    /// Returns [`EngineError::DivisionByZero`] when `shares` is zero.
    pub fn unit_value(&self) -> Result<f64> {
        if self.shares == 0.0 {
            return Err(EngineError::DivisionByZero {
                date: self.date,
                field: "unit_value",
            });
        }
        Ok(self.nav / self.shares)
    }

    /// Benchmark level usable as a return denominator.
    ///
    /// # Errors
    /// Returns [`EngineError::DivisionByZero`] when the level is zero.
    pub fn benchmark_level(&self) -> Result<f64> {
        if self.benchmark == 0.0 {
            return Err(EngineError::DivisionByZero {
                date: self.date,
                field: "benchmark",
            });
        }
        Ok(self.benchmark)
    }
}

/// An ordered, duplicate-free sequence of observations.
///
/// Construction sorts the records ascending by date, so every consumer can
/// rely on chronological order regardless of how the input arrived.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationSeries {
    records: Vec<Observation>,
}

impl ObservationSeries {
    /// Build a series from records in any order.
    ///
    /// # Errors
    /// Returns [`EngineError::EmptySeries`] for an empty input and
    /// [`EngineError::DuplicateDate`] if two records share a date.
    pub fn new(mut records: Vec<Observation>) -> Result<Self> {
        if records.is_empty() {
            return Err(EngineError::EmptySeries);
        }

        records.sort_by_key(|r| r.date);

        if let Some(pair) = records.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(EngineError::DuplicateDate(pair[0].date));
        }

        Ok(Self { records })
    }

    /// Number of observations.
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Always `false`; a series holds at least one record.
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in ascending date order.
    pub fn records(&self) -> &[Observation] {
        &self.records
    }

    /// Iterate records in ascending date order.
    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.records.iter()
    }

    /// Earliest observation date.
    pub fn first_date(&self) -> NaiveDate {
        self.records[0].date
    }

    /// Latest observation date.
    pub fn last_date(&self) -> NaiveDate {
        self.records[self.records.len() - 1].date
    }

    /// Look up the observation for an exact date.
    pub fn get(&self, date: NaiveDate) -> Option<&Observation> {
        self.records
            .binary_search_by_key(&date, |r| r.date)
            .ok()
            .map(|i| &self.records[i])
    }
}

impl<'a> IntoIterator for &'a ObservationSeries {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_series_sorts_records() {
        let series = ObservationSeries::new(vec![
            Observation::new(date(2024, 1, 4), 1.0, 1.0, 1.0),
            Observation::new(date(2024, 1, 2), 1.0, 1.0, 1.0),
            Observation::new(date(2024, 1, 3), 1.0, 1.0, 1.0),
        ])
        .unwrap();

        let dates: Vec<_> = series.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date(2024, 1, 2), date(2024, 1, 3), date(2024, 1, 4)]);
        assert_eq!(series.first_date(), date(2024, 1, 2));
        assert_eq!(series.last_date(), date(2024, 1, 4));
    }

    #[test]
    fn test_series_rejects_empty() {
        assert_eq!(ObservationSeries::new(vec![]), Err(EngineError::EmptySeries));
    }

    #[test]
    fn test_series_rejects_duplicate_dates() {
        let result = ObservationSeries::new(vec![
            Observation::new(date(2024, 1, 3), 1.0, 1.0, 1.0),
            Observation::new(date(2024, 1, 2), 1.0, 1.0, 1.0),
            Observation::new(date(2024, 1, 3), 2.0, 1.0, 1.0),
        ]);

        assert_eq!(result, Err(EngineError::DuplicateDate(date(2024, 1, 3))));
    }

    #[test]
    fn test_unit_value_zero_shares() {
        let obs = Observation::new(date(2024, 1, 2), 100.0, 0.0, 1000.0);
        assert!(matches!(
            obs.unit_value(),
            Err(EngineError::DivisionByZero {
                field: "unit_value",
                ..
            })
        ));
    }

    #[test]
    fn test_from_unit_value() {
        let obs = Observation::from_unit_value(date(2024, 1, 2), 1.25, 1000.0);
        assert_eq!(obs.unit_value(), Ok(1.25));
        assert_eq!(obs.benchmark_level(), Ok(1000.0));
    }
}
