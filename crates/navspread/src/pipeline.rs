//! Load-then-compute entry points.

use crate::error::Result;
use chrono::NaiveDate;
use navspread_data::{SeriesLoader, SeriesSchema};
use navspread_engine::{ObservationSeries, PerformanceSnapshot, SnapshotOptions};
use std::path::Path;
use tracing::info;

/// Load `path` with `schema` and compute the snapshot as of `as_of`.
///
/// # Errors
/// Load failures surface as [`Error::Data`](crate::Error::Data); an `as_of`
/// before the first observation as [`Error::Engine`](crate::Error::Engine).
pub fn analyze_file(
    path: impl AsRef<Path>,
    schema: &SeriesSchema,
    as_of: Option<NaiveDate>,
    options: SnapshotOptions,
) -> Result<PerformanceSnapshot> {
    let series = SeriesLoader::new(schema.clone()).load_path(path)?;
    analyze_series(&series, as_of, options)
}

/// Compute the snapshot for an already loaded series.
pub fn analyze_series(
    series: &ObservationSeries,
    as_of: Option<NaiveDate>,
    options: SnapshotOptions,
) -> Result<PerformanceSnapshot> {
    let snapshot = PerformanceSnapshot::compute(series, as_of, options)?;
    info!(
        reference_date = %snapshot.reference_date,
        iso_week = snapshot.weekly.iso_week,
        "snapshot computed"
    );
    Ok(snapshot)
}
