//! Derived per-date figures produced by the return calculator.

use crate::error::EngineError;
use chrono::NaiveDate;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// The two tracked quantities of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    /// The managed fund, measured by unit value.
    #[display("fund")]
    Fund,

    /// The benchmark index, measured by index level.
    #[display("benchmark")]
    Benchmark,
}

impl Quantity {
    /// Both quantities in display order.
    pub const ALL: [Self; 2] = [Self::Fund, Self::Benchmark];
}

/// Derived figures for one observation date.
///
/// Every numeric field is optional: `None` marks an arithmetic gap (zero
/// shares, zero benchmark level, or no prior date) for that date only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedRecord {
    /// Observation date.
    pub date: NaiveDate,

    /// Net asset value divided by shares outstanding.
    pub unit_value: Option<f64>,

    /// Benchmark index level.
    pub benchmark_level: Option<f64>,

    /// Fund return versus the previous date.
    pub fund_return: Option<f64>,

    /// Benchmark return versus the previous date.
    pub bench_return: Option<f64>,

    /// Chain-linked fund return since the first date.
    pub fund_cum: Option<f64>,

    /// Chain-linked benchmark return since the first date.
    pub bench_cum: Option<f64>,

    /// `fund_cum - bench_cum`.
    pub spread: Option<f64>,
}

impl DerivedRecord {
    /// Price level of a quantity: unit value for the fund, index level for the benchmark.
    pub const fn level(&self, quantity: Quantity) -> Option<f64> {
        match quantity {
            Quantity::Fund => self.unit_value,
            Quantity::Benchmark => self.benchmark_level,
        }
    }

    /// Daily return of a quantity.
    pub const fn daily_return(&self, quantity: Quantity) -> Option<f64> {
        match quantity {
            Quantity::Fund => self.fund_return,
            Quantity::Benchmark => self.bench_return,
        }
    }

    /// Cumulative return of a quantity.
    pub const fn cumulative_return(&self, quantity: Quantity) -> Option<f64> {
        match quantity {
            Quantity::Fund => self.fund_cum,
            Quantity::Benchmark => self.bench_cum,
        }
    }
}

/// Derived figures over the same date domain as the input series.
///
/// Records are kept in strictly ascending date order; deserialized input is
/// sorted and rejected on duplicate dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDerivedSeries")]
pub struct DerivedSeries {
    records: Vec<DerivedRecord>,
}

#[derive(Deserialize)]
struct RawDerivedSeries {
    records: Vec<DerivedRecord>,
}

impl TryFrom<RawDerivedSeries> for DerivedSeries {
    type Error = EngineError;

    fn try_from(raw: RawDerivedSeries) -> Result<Self, Self::Error> {
        let mut records = raw.records;
        if records.is_empty() {
            return Err(EngineError::EmptySeries);
        }

        records.sort_by_key(|r| r.date);
        if let Some(pair) = records.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(EngineError::DuplicateDate(pair[0].date));
        }

        Ok(Self { records })
    }
}

impl DerivedSeries {
    pub(crate) const fn from_records(records: Vec<DerivedRecord>) -> Self {
        Self { records }
    }

    /// Number of dates.
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the series has no dates.
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in ascending date order.
    pub fn records(&self) -> &[DerivedRecord] {
        &self.records
    }

    /// Iterate records in ascending date order.
    pub fn iter(&self) -> std::slice::Iter<'_, DerivedRecord> {
        self.records.iter()
    }

    /// Iterate dates in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.records.iter().map(|r| r.date)
    }

    /// Earliest date.
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|r| r.date)
    }

    /// Latest date.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date)
    }

    /// Record for an exact date.
    pub fn get(&self, date: NaiveDate) -> Option<&DerivedRecord> {
        self.records
            .binary_search_by_key(&date, |r| r.date)
            .ok()
            .map(|i| &self.records[i])
    }

    /// Whether the series has a record for `date`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.get(date).is_some()
    }

    /// Latest date on or before `cutoff`.
    pub fn latest_on_or_before(&self, cutoff: NaiveDate) -> Option<NaiveDate> {
        let idx = self.records.partition_point(|r| r.date <= cutoff);
        idx.checked_sub(1).map(|i| self.records[i].date)
    }

    /// Level of `quantity` on `date`, if both the date and the value exist.
    pub fn level(&self, date: NaiveDate, quantity: Quantity) -> Option<f64> {
        self.get(date).and_then(|r| r.level(quantity))
    }

    /// The most recent `n` records.
    pub fn tail(&self, n: usize) -> &[DerivedRecord] {
        let start = self.records.len().saturating_sub(n);
        &self.records[start..]
    }
}

impl<'a> IntoIterator for &'a DerivedSeries {
    type Item = &'a DerivedRecord;
    type IntoIter = std::slice::Iter<'a, DerivedRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
