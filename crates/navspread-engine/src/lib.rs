#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/navspread/navspread/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod calculator;
pub mod derived;
pub mod error;
pub mod observation;
pub mod snapshot;
pub mod weekly;
pub mod window;

pub use calculator::ReturnCalculator;
pub use derived::{DerivedRecord, DerivedSeries, Quantity};
pub use error::{EngineError, Result};
pub use observation::{Observation, ObservationSeries};
pub use snapshot::{PerformanceSnapshot, SnapshotOptions};
pub use weekly::{WeekTotal, WeekdaySlot, WeeklyAttributionBuilder, WeeklyTable};
pub use window::{
    PeriodWindowResolver, TRAILING_YEAR_DAYS, WindowDefinition, WindowResult, WindowRule,
    WindowTable, iso_week_key, previous_iso_week,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
