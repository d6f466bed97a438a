#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/navspread/navspread/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod pipeline;

// Re-export main types from sub-crates
pub use navspread_data as data;
pub use navspread_engine as engine;
pub use navspread_output as output;

pub use error::{Error, Result};
pub use pipeline::{analyze_file, analyze_series};

pub use navspread_data::{SeriesLoader, SeriesSchema};
pub use navspread_engine::{
    DerivedSeries, Observation, ObservationSeries, PerformanceSnapshot, PeriodWindowResolver,
    Quantity, ReturnCalculator, SnapshotOptions, WeeklyAttributionBuilder, WindowRule,
};
pub use navspread_output::{ExportFormat, Exporter, Labels, Report};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
