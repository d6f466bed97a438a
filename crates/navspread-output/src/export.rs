//! Export functionality for derived series and summary tables.
//!
//! Every exportable value renders to CSV, compact JSON or pretty JSON. CSV
//! output flattens tables into one row per cell group so it can be loaded
//! straight into a spreadsheet or charting tool.

use crate::table::{day_caption, week_caption, window_caption};
use chrono::NaiveDate;
use navspread_engine::{DerivedSeries, PerformanceSnapshot, WeeklyTable, WindowTable};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writer produced bytes that are not UTF-8.
    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty_json" | "pretty" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// One line of an exported weekly table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeeklyRowExport {
    /// Row caption.
    pub label: String,

    /// Weekday date, or the anchor date for the total row.
    pub date: NaiveDate,

    /// Whether this is the week total.
    pub total: bool,

    /// Fund return.
    pub fund: Option<f64>,

    /// Benchmark return.
    pub benchmark: Option<f64>,
}

impl WeeklyRowExport {
    /// Flatten a weekly table, total last.
    pub fn from_table(table: &WeeklyTable) -> Vec<Self> {
        let mut rows: Vec<Self> = table
            .days
            .iter()
            .map(|slot| Self {
                label: day_caption(slot.date),
                date: slot.date,
                total: false,
                fund: slot.fund,
                benchmark: slot.benchmark,
            })
            .collect();

        if let Some(total) = &table.total {
            rows.push(Self {
                label: week_caption(table.iso_week),
                date: total.anchor,
                total: true,
                fund: total.fund,
                benchmark: total.benchmark,
            });
        }
        rows
    }
}

/// One window of an exported window table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowRowExport {
    /// Short window label.
    pub label: String,

    /// Column caption.
    pub caption: String,

    /// Resolved start date.
    pub start: Option<NaiveDate>,

    /// Reference date.
    pub end: NaiveDate,

    /// Fund return over the window.
    pub fund: Option<f64>,

    /// Benchmark return over the window.
    pub benchmark: Option<f64>,

    /// Fund minus benchmark.
    pub spread: Option<f64>,
}

impl WindowRowExport {
    /// Flatten a window table in column order.
    pub fn from_table(table: &WindowTable) -> Vec<Self> {
        table
            .windows
            .iter()
            .map(|w| Self {
                label: w.label.clone(),
                caption: window_caption(&w.label).to_string(),
                start: w.start,
                end: w.end,
                fund: w.fund,
                benchmark: w.benchmark,
                spread: w.spread(),
            })
            .collect()
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn write_csv<T: Serialize>(rows: impl IntoIterator<Item = T>) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for row in rows {
        wtr.serialize(row)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

fn write_json<T: Serialize>(value: &T, format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(value)?),
        _ => Ok(serde_json::to_string(value)?),
    }
}

impl Exporter for DerivedSeries {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => write_csv(self.iter()),
            _ => write_json(&self.records(), format),
        }
    }
}

impl Exporter for WeeklyTable {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => write_csv(WeeklyRowExport::from_table(self)),
            _ => write_json(self, format),
        }
    }
}

impl Exporter for WindowTable {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => write_csv(WindowRowExport::from_table(self)),
            _ => write_json(self, format),
        }
    }
}

/// Write the derived series and both tables of a snapshot into `dir`.
///
/// Files are named `series`, `weekly` and `windows` with the format's
/// extension. The directory is created if missing.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or any file fails to
/// serialize or write.
pub fn export_snapshot(
    snapshot: &PerformanceSnapshot,
    dir: &Path,
    format: ExportFormat,
) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(dir)?;

    let outputs: [(&str, &dyn Exporter); 3] = [
        ("series", &snapshot.derived),
        ("weekly", &snapshot.weekly),
        ("windows", &snapshot.windows),
    ];

    let mut written = Vec::with_capacity(outputs.len());
    for (stem, exporter) in outputs {
        let path = dir.join(format!("{stem}.{}", format.extension()));
        exporter.export_to_file(&path, format)?;
        written.push(path);
    }
    Ok(written)
}
