//! JSON report documents.

use crate::export::{WeeklyRowExport, WindowRowExport};
use crate::table::Labels;
use chrono::{DateTime, NaiveDate, Utc};
use navspread_engine::PerformanceSnapshot;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Builder finished without a snapshot.
    #[error("report has no snapshot to summarize")]
    MissingSnapshot,
}

/// A performance summary for one reference date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Fund and benchmark display names.
    pub labels: Labels,

    /// Report generation timestamp.
    pub generated_at: DateTime<Utc>,

    /// Date the figures are as of.
    pub reference_date: NaiveDate,

    /// Report contents (JSON format).
    pub contents: serde_json::Value,
}

impl Report {
    /// Create a new report.
    pub fn new(labels: Labels, reference_date: NaiveDate, contents: serde_json::Value) -> Self {
        Self {
            labels,
            generated_at: Utc::now(),
            reference_date,
            contents,
        }
    }

    /// Summarize a snapshot: latest record, weekly rows and window rows.
    pub fn from_snapshot(
        snapshot: &PerformanceSnapshot,
        labels: Labels,
    ) -> Result<Self, ReportError> {
        ReportBuilder::new().labels(labels).snapshot(snapshot).build()
    }

    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as pretty JSON.
    pub fn write_to(&self, path: &std::path::Path) -> Result<(), ReportError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Builder for creating reports.
#[derive(Debug, Default)]
pub struct ReportBuilder<'a> {
    labels: Option<Labels>,
    snapshot: Option<&'a PerformanceSnapshot>,
    include_series: bool,
}

impl<'a> ReportBuilder<'a> {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the display labels.
    pub fn labels(mut self, labels: Labels) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Set the snapshot to summarize.
    pub const fn snapshot(mut self, snapshot: &'a PerformanceSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    /// Also embed the full derived series.
    pub const fn include_series(mut self, include: bool) -> Self {
        self.include_series = include;
        self
    }

    /// Build the report.
    pub fn build(self) -> Result<Report, ReportError> {
        let snapshot = self.snapshot.ok_or(ReportError::MissingSnapshot)?;

        let mut contents = json!({
            "latest": snapshot.latest(),
            "week": {
                "iso_year": snapshot.weekly.iso_year,
                "iso_week": snapshot.weekly.iso_week,
                "rows": WeeklyRowExport::from_table(&snapshot.weekly),
            },
            "windows": WindowRowExport::from_table(&snapshot.windows),
        });
        if self.include_series {
            contents["series"] = serde_json::to_value(snapshot.derived.records())?;
        }

        Ok(Report::new(
            self.labels.unwrap_or_default(),
            snapshot.reference_date,
            contents,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navspread_engine::{Observation, ObservationSeries, SnapshotOptions};

    fn snapshot() -> PerformanceSnapshot {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let series = ObservationSeries::new(vec![
            Observation::new(d(5), 100.0, 100.0, 1000.0),
            Observation::new(d(8), 101.0, 100.0, 1000.0),
            Observation::new(d(9), 102.0, 100.0, 1010.0),
        ])
        .unwrap();
        PerformanceSnapshot::compute(&series, None, SnapshotOptions::default()).unwrap()
    }

    #[test]
    fn test_report_from_snapshot() {
        let snapshot = snapshot();
        let report = Report::from_snapshot(&snapshot, Labels::new("MKSF", "IBOV")).unwrap();

        assert_eq!(report.labels.fund, "MKSF");
        assert_eq!(report.reference_date, snapshot.reference_date);
        assert_eq!(report.contents["week"]["iso_week"], 2);
        assert_eq!(report.contents["week"]["rows"].as_array().unwrap().len(), 6);
        assert_eq!(report.contents["windows"].as_array().unwrap().len(), 4);
        assert!(report.contents.get("series").is_none());
    }

    #[test]
    fn test_report_builder_with_series() {
        let snapshot = snapshot();
        let report = ReportBuilder::new()
            .snapshot(&snapshot)
            .include_series(true)
            .build()
            .unwrap();

        assert_eq!(report.labels, Labels::default());
        assert_eq!(report.contents["series"].as_array().unwrap().len(), 3);
        assert!(report.to_json().unwrap().contains("\"generated_at\""));
    }

    #[test]
    fn test_report_builder_requires_snapshot() {
        let err = ReportBuilder::new().build().unwrap_err();
        assert!(matches!(err, ReportError::MissingSnapshot));
    }
}
