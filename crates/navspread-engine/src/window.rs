//! Period window resolution and window returns.
//!
//! A window is a start-boundary rule evaluated against a reference date.
//! Observation dates are trading days, so boundaries are resolved against the
//! dates actually present in the series: calendar predicates pick the first
//! matching date, trailing cutoffs pick the last date on or before the cutoff.
//!
//! Window returns are direct level ratios between the two anchor dates.

use crate::calculator::ratio_return;
use crate::derived::{DerivedSeries, Quantity};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Calendar days in the trailing-twelve-month window.
pub const TRAILING_YEAR_DAYS: i64 = 365;

/// Rule locating the start boundary of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "rule", content = "value")]
pub enum WindowRule {
    /// First date in the same year and month as the reference date.
    MonthToDate,

    /// First date in the same year as the reference date.
    YearToDate,

    /// Latest date on or before `reference - days`.
    Trailing {
        /// Calendar days to look back.
        days: i64,
    },

    /// The first date of the series.
    SinceInception,

    /// Last observation of the ISO week preceding the reference date's week.
    PreviousWeekClose,

    /// Latest date on or before a caller-supplied date.
    Since(NaiveDate),
}

/// A labelled window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowDefinition {
    /// Display label.
    pub label: String,

    /// Start-boundary rule.
    pub rule: WindowRule,
}

impl WindowDefinition {
    /// Create a window definition.
    pub fn new(label: impl Into<String>, rule: WindowRule) -> Self {
        Self {
            label: label.into(),
            rule,
        }
    }

    /// Month to date.
    pub fn month_to_date() -> Self {
        Self::new("MTD", WindowRule::MonthToDate)
    }

    /// Year to date.
    pub fn year_to_date() -> Self {
        Self::new("YTD", WindowRule::YearToDate)
    }

    /// Trailing twelve months, with a configurable look-back in days.
    pub fn trailing(days: i64) -> Self {
        Self::new("LTM", WindowRule::Trailing { days })
    }

    /// Since inception.
    pub fn since_inception() -> Self {
        Self::new("ITD", WindowRule::SinceInception)
    }

    /// Week to date, anchored on the previous week's last close.
    pub fn week_to_date() -> Self {
        Self::new("WTD", WindowRule::PreviousWeekClose)
    }

    /// MTD, YTD, LTM and ITD in display order.
    pub fn standard(trailing_days: i64) -> Vec<Self> {
        vec![
            Self::month_to_date(),
            Self::year_to_date(),
            Self::trailing(trailing_days),
            Self::since_inception(),
        ]
    }
}

/// Fund and benchmark returns over one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowResult {
    /// Window label.
    pub label: String,

    /// Resolved start date, `None` when the window is not computable.
    pub start: Option<NaiveDate>,

    /// End (reference) date.
    pub end: NaiveDate,

    /// Fund return over the window.
    pub fund: Option<f64>,

    /// Benchmark return over the window.
    pub benchmark: Option<f64>,
}

impl WindowResult {
    /// Return for one quantity.
    pub const fn value(&self, quantity: Quantity) -> Option<f64> {
        match quantity {
            Quantity::Fund => self.fund,
            Quantity::Benchmark => self.benchmark,
        }
    }

    /// Fund return minus benchmark return.
    pub fn spread(&self) -> Option<f64> {
        Some(self.fund? - self.benchmark?)
    }

    /// Whether neither quantity could be computed.
    pub const fn is_empty(&self) -> bool {
        self.fund.is_none() && self.benchmark.is_none()
    }
}

/// The window summary table for one reference date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowTable {
    /// Reference date every window ends on.
    pub reference_date: NaiveDate,

    /// Windows in definition order.
    pub windows: Vec<WindowResult>,
}

impl WindowTable {
    /// Look up a window by label.
    pub fn get(&self, label: &str) -> Option<&WindowResult> {
        self.windows.iter().find(|w| w.label == label)
    }
}

/// Resolves window boundaries and computes window returns.
#[derive(Debug, Default, Clone, Copy)]
pub struct PeriodWindowResolver;

impl PeriodWindowResolver {
    /// Create a new resolver.
    pub const fn new() -> Self {
        Self
    }

    /// Resolve the start date of `rule` relative to `reference_date`.
    ///
    /// Returns `None` when no series date satisfies the rule, which marks the
    /// window as not computable over this series.
    pub fn resolve_start(
        &self,
        series: &DerivedSeries,
        rule: WindowRule,
        reference_date: NaiveDate,
    ) -> Option<NaiveDate> {
        let start = match rule {
            WindowRule::MonthToDate => series.dates().find(|d| {
                d.year() == reference_date.year() && d.month() == reference_date.month()
            }),
            WindowRule::YearToDate => series.dates().find(|d| d.year() == reference_date.year()),
            WindowRule::Trailing { days } => Duration::try_days(days)
                .and_then(|lookback| reference_date.checked_sub_signed(lookback))
                .and_then(|cutoff| series.latest_on_or_before(cutoff)),
            WindowRule::SinceInception => series.first_date(),
            WindowRule::PreviousWeekClose => {
                let target = previous_iso_week(reference_date)?;
                series
                    .dates()
                    .filter(|d| iso_week_key(*d) == target)
                    .max()
            }
            WindowRule::Since(date) => series.latest_on_or_before(date),
        };

        debug!(?rule, %reference_date, ?start, "resolved window start");
        start
    }

    /// `level(end) / level(start) - 1` for `quantity`.
    ///
    /// `None` if either date is absent, either level is missing, the start
    /// level is zero, or `start` falls after `end`.
    pub fn window_return(
        &self,
        series: &DerivedSeries,
        start_date: NaiveDate,
        end_date: NaiveDate,
        quantity: Quantity,
    ) -> Option<f64> {
        if start_date > end_date {
            debug!(%start_date, %end_date, "inverted window");
            return None;
        }

        let start = series.level(start_date, quantity)?;
        let end = series.level(end_date, quantity)?;

        match ratio_return(end_date, "window_return", start, end) {
            Ok(r) => Some(r),
            Err(err) => {
                warn!(%err, %quantity, "window return not computable");
                None
            }
        }
    }

    /// Evaluate one labelled window ending on `reference_date`.
    pub fn evaluate(
        &self,
        series: &DerivedSeries,
        definition: &WindowDefinition,
        reference_date: NaiveDate,
    ) -> WindowResult {
        let start = self.resolve_start(series, definition.rule, reference_date);
        match start {
            Some(start) => self.evaluate_range(series, &definition.label, start, reference_date),
            None => WindowResult {
                label: definition.label.clone(),
                start: None,
                end: reference_date,
                fund: None,
                benchmark: None,
            },
        }
    }

    /// Evaluate an explicit `[start, end]` pair without boundary resolution.
    pub fn evaluate_range(
        &self,
        series: &DerivedSeries,
        label: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> WindowResult {
        WindowResult {
            label: label.to_string(),
            start: Some(start),
            end,
            fund: self.window_return(series, start, end, Quantity::Fund),
            benchmark: self.window_return(series, start, end, Quantity::Benchmark),
        }
    }

    /// Evaluate a list of windows against one reference date.
    pub fn table(
        &self,
        series: &DerivedSeries,
        definitions: &[WindowDefinition],
        reference_date: NaiveDate,
    ) -> WindowTable {
        WindowTable {
            reference_date,
            windows: definitions
                .iter()
                .map(|def| self.evaluate(series, def, reference_date))
                .collect(),
        }
    }

    /// MTD, YTD, LTM (365 days) and ITD ending on `reference_date`.
    pub fn standard_windows(&self, series: &DerivedSeries, reference_date: NaiveDate) -> WindowTable {
        self.table(
            series,
            &WindowDefinition::standard(TRAILING_YEAR_DAYS),
            reference_date,
        )
    }
}

/// `(iso_year, iso_week)` of a date.
pub fn iso_week_key(date: NaiveDate) -> (i32, u32) {
    let week = date.iso_week();
    (week.year(), week.week())
}

/// `(iso_year, iso_week)` of the week before the one containing `date`.
///
/// Stepping back seven days keeps year wrap-around correct: the week before
/// 2026-W01 is 2025-W52, not a bare week 0.
pub fn previous_iso_week(date: NaiveDate) -> Option<(i32, u32)> {
    date.checked_sub_signed(Duration::days(7)).map(iso_week_key)
}
