//! Current-week attribution table.

use crate::derived::{DerivedSeries, Quantity};
use crate::window::{PeriodWindowResolver, WindowRule, iso_week_key};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Monday through Friday.
pub const WEEKDAYS: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

/// One weekday row of the weekly table.
///
/// Returns are `None` for holidays and days that have not happened yet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeekdaySlot {
    /// Calendar date of the slot.
    pub date: NaiveDate,

    /// Fund daily return.
    pub fund: Option<f64>,

    /// Benchmark daily return.
    pub benchmark: Option<f64>,
}

impl WeekdaySlot {
    /// Day of the week.
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    /// Whether the series had an observation on this date.
    pub const fn is_blank(&self) -> bool {
        self.fund.is_none() && self.benchmark.is_none()
    }
}

/// Week-total row, measured from the previous week's last close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeekTotal {
    /// Last observation of the preceding ISO week.
    pub anchor: NaiveDate,

    /// Fund unit-value return from the anchor to the reference date.
    pub fund: Option<f64>,

    /// Benchmark level return from the anchor to the reference date.
    pub benchmark: Option<f64>,
}

/// Daily returns for the ISO week containing the reference date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyTable {
    /// Reference date.
    pub reference_date: NaiveDate,

    /// ISO year of the reference week.
    pub iso_year: i32,

    /// ISO week number of the reference week.
    pub iso_week: u32,

    /// Monday to Friday rows.
    pub days: Vec<WeekdaySlot>,

    /// Week total, omitted when the preceding week has no observation.
    pub total: Option<WeekTotal>,
}

impl WeeklyTable {
    /// Monday of the reference week.
    pub fn week_start(&self) -> NaiveDate {
        monday_of(self.reference_date)
    }
}

/// Builds [`WeeklyTable`]s from a derived series.
#[derive(Debug, Default, Clone, Copy)]
pub struct WeeklyAttributionBuilder {
    resolver: PeriodWindowResolver,
}

impl WeeklyAttributionBuilder {
    /// Create a builder using the default window resolver.
    pub const fn new() -> Self {
        Self {
            resolver: PeriodWindowResolver::new(),
        }
    }

    /// Build the table for the ISO week containing `reference_date`.
    pub fn build(&self, series: &DerivedSeries, reference_date: NaiveDate) -> WeeklyTable {
        let monday = monday_of(reference_date);
        let days = (0..WEEKDAYS.len() as i64)
            .map(|offset| {
                let date = monday + Duration::days(offset);
                // Days after the reference date have not elapsed yet.
                let record = series.get(date).filter(|_| date <= reference_date);
                WeekdaySlot {
                    date,
                    fund: record.and_then(|r| r.daily_return(Quantity::Fund)),
                    benchmark: record.and_then(|r| r.daily_return(Quantity::Benchmark)),
                }
            })
            .collect();

        let total = match self
            .resolver
            .resolve_start(series, WindowRule::PreviousWeekClose, reference_date)
        {
            Some(anchor) => Some(WeekTotal {
                anchor,
                fund: self
                    .resolver
                    .window_return(series, anchor, reference_date, Quantity::Fund),
                benchmark: self
                    .resolver
                    .window_return(series, anchor, reference_date, Quantity::Benchmark),
            }),
            None => {
                warn!(%reference_date, "no observation in preceding week; omitting week total");
                None
            }
        };

        let (iso_year, iso_week) = iso_week_key(reference_date);
        WeeklyTable {
            reference_date,
            iso_year,
            iso_week,
            days,
            total,
        }
    }
}

fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}
