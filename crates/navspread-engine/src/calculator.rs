//! Daily and cumulative return derivation.
//!
//! For each date `d` with predecessor `p`:
//!
//! ```text
//! unit_value(d)   = nav(d) / shares(d)
//! fund_return(d)  = unit_value(d) / unit_value(p) - 1
//! bench_return(d) = benchmark(d) / benchmark(p) - 1
//! fund_cum(d)     = prod_{k <= d} (1 + fund_return(k)) - 1
//! spread(d)       = fund_cum(d) - bench_cum(d)
//! ```
//!
//! The first date has no return and a cumulative return of exactly zero.

use crate::derived::{DerivedRecord, DerivedSeries};
use crate::error::{EngineError, Result};
use crate::observation::ObservationSeries;
use chrono::NaiveDate;
use tracing::warn;

/// Stateless calculator turning observations into a [`DerivedSeries`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ReturnCalculator;

impl ReturnCalculator {
    /// Create a new calculator.
    pub const fn new() -> Self {
        Self
    }

    /// Derive unit values, daily and cumulative returns, and spread.
    ///
    /// Division by zero on a single date leaves that date's affected cells as
    /// `None`; the rest of the series is still derived.
    pub fn derive(&self, observations: &ObservationSeries) -> DerivedSeries {
        let mut records = Vec::with_capacity(observations.len());
        let mut fund_chain = Chain::default();
        let mut bench_chain = Chain::default();
        let mut prev: Option<(Option<f64>, Option<f64>)> = None;

        for obs in observations {
            let unit_value = gap_to_none(obs.unit_value());
            let benchmark_level = gap_to_none(obs.benchmark_level());

            let (fund_return, bench_return) = match prev {
                None => (None, None),
                Some((prev_unit, prev_bench)) => (
                    period_return(obs.date, "fund_return", prev_unit, unit_value),
                    period_return(obs.date, "bench_return", prev_bench, benchmark_level),
                ),
            };

            let (fund_cum, bench_cum) = if prev.is_none() {
                (Some(0.0), Some(0.0))
            } else {
                (fund_chain.link(fund_return), bench_chain.link(bench_return))
            };

            let spread = match (fund_cum, bench_cum) {
                (Some(f), Some(b)) => Some(f - b),
                _ => None,
            };

            records.push(DerivedRecord {
                date: obs.date,
                unit_value,
                benchmark_level,
                fund_return,
                bench_return,
                fund_cum,
                bench_cum,
                spread,
            });

            prev = Some((unit_value, benchmark_level));
        }

        DerivedSeries::from_records(records)
    }
}

/// Running compounded growth factor.
#[derive(Debug)]
struct Chain {
    factor: f64,
}

impl Default for Chain {
    fn default() -> Self {
        Self { factor: 1.0 }
    }
}

impl Chain {
    /// Compound one period. A missing return skips the factor and yields no
    /// cumulative value for that date.
    fn link(&mut self, period_return: Option<f64>) -> Option<f64> {
        let r = period_return?;
        self.factor *= 1.0 + r;
        Some(self.factor - 1.0)
    }
}

fn gap_to_none(value: Result<f64>) -> Option<f64> {
    match value {
        Ok(v) => Some(v),
        Err(err) => {
            warn!(%err, "arithmetic gap in observation");
            None
        }
    }
}

/// `current / previous - 1`; fails when `previous` is zero.
pub(crate) fn ratio_return(
    date: NaiveDate,
    field: &'static str,
    previous: f64,
    current: f64,
) -> Result<f64> {
    if previous == 0.0 {
        return Err(EngineError::DivisionByZero { date, field });
    }
    Ok(current / previous - 1.0)
}

fn period_return(
    date: NaiveDate,
    field: &'static str,
    previous: Option<f64>,
    current: Option<f64>,
) -> Option<f64> {
    let (previous, current) = (previous?, current?);
    gap_to_none(ratio_return(date, field, previous, current))
}
