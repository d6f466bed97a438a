//! One-call derivation of every figure for a reference date.

use crate::calculator::ReturnCalculator;
use crate::derived::{DerivedRecord, DerivedSeries};
use crate::error::{EngineError, Result};
use crate::observation::ObservationSeries;
use crate::weekly::{WeeklyAttributionBuilder, WeeklyTable};
use crate::window::{PeriodWindowResolver, TRAILING_YEAR_DAYS, WindowDefinition, WindowTable};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Tunables for [`PerformanceSnapshot::compute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotOptions {
    /// Look-back of the trailing window in calendar days.
    pub trailing_days: i64,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            trailing_days: TRAILING_YEAR_DAYS,
        }
    }
}

/// Derived series plus both summary tables for one reference date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceSnapshot {
    /// Resolved reference date.
    pub reference_date: NaiveDate,

    /// Per-date derived figures.
    pub derived: DerivedSeries,

    /// Current-week attribution table.
    pub weekly: WeeklyTable,

    /// MTD, YTD, LTM and ITD returns.
    pub windows: WindowTable,
}

impl PerformanceSnapshot {
    /// Run the full derivation.
    ///
    /// `as_of` defaults to the last observation. Any other date resolves to the
    /// latest observation on or before it.
    ///
    /// # Errors
    /// Returns [`EngineError::ReferenceBeforeSeries`] if `as_of` precedes the
    /// first observation.
    pub fn compute(
        observations: &ObservationSeries,
        as_of: Option<NaiveDate>,
        options: SnapshotOptions,
    ) -> Result<Self> {
        let derived = ReturnCalculator::new().derive(observations);
        let reference_date = resolve_reference(&derived, observations, as_of)?;
        debug!(%reference_date, records = derived.len(), "computing snapshot");

        let resolver = PeriodWindowResolver::new();
        let windows = resolver.table(
            &derived,
            &WindowDefinition::standard(options.trailing_days),
            reference_date,
        );
        let weekly = WeeklyAttributionBuilder::new().build(&derived, reference_date);

        Ok(Self {
            reference_date,
            derived,
            weekly,
            windows,
        })
    }

    /// Derived record on the reference date.
    pub fn latest(&self) -> Option<&DerivedRecord> {
        self.derived.get(self.reference_date)
    }
}

fn resolve_reference(
    derived: &DerivedSeries,
    observations: &ObservationSeries,
    as_of: Option<NaiveDate>,
) -> Result<NaiveDate> {
    let Some(as_of) = as_of else {
        return Ok(observations.last_date());
    };
    derived
        .latest_on_or_before(as_of)
        .ok_or(EngineError::ReferenceBeforeSeries {
            reference: as_of,
            first: observations.first_date(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::Observation;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn observations() -> ObservationSeries {
        ObservationSeries::new(vec![
            Observation::new(date(2024, 1, 2), 100.0, 100.0, 1000.0),
            Observation::new(date(2024, 1, 5), 101.0, 100.0, 1005.0),
            Observation::new(date(2024, 1, 9), 103.0, 100.0, 1010.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_default_reference_is_last_date() {
        let snapshot =
            PerformanceSnapshot::compute(&observations(), None, SnapshotOptions::default()).unwrap();

        assert_eq!(snapshot.reference_date, date(2024, 1, 9));
        assert_eq!(snapshot.latest().unwrap().date, date(2024, 1, 9));
        assert_eq!(snapshot.windows.windows.len(), 4);
        assert_eq!(snapshot.weekly.total.unwrap().anchor, date(2024, 1, 5));
    }

    #[test]
    fn test_as_of_resolves_to_latest_available() {
        let snapshot = PerformanceSnapshot::compute(
            &observations(),
            Some(date(2024, 1, 7)),
            SnapshotOptions::default(),
        )
        .unwrap();

        assert_eq!(snapshot.reference_date, date(2024, 1, 5));
    }

    #[test]
    fn test_oversized_trailing_horizon_leaves_ltm_empty() {
        let options = SnapshotOptions {
            trailing_days: 200_000_000_000_000,
        };
        let snapshot = PerformanceSnapshot::compute(&observations(), None, options).unwrap();

        let ltm = snapshot.windows.get("LTM").unwrap();
        assert_eq!(ltm.start, None);
        assert!(ltm.is_empty());
        assert!(snapshot.windows.get("ITD").unwrap().fund.is_some());
    }

    #[test]
    fn test_as_of_before_series_fails() {
        let result = PerformanceSnapshot::compute(
            &observations(),
            Some(date(2023, 12, 1)),
            SnapshotOptions::default(),
        );

        assert_eq!(
            result,
            Err(EngineError::ReferenceBeforeSeries {
                reference: date(2023, 12, 1),
                first: date(2024, 1, 2),
            })
        );
    }
}
