//! CSV and JSON observation loaders.

use crate::error::{DataError, Result};
use crate::schema::{FundColumns, SeriesSchema};
use chrono::NaiveDate;
use navspread_engine::{Observation, ObservationSeries};
use polars::prelude::*;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, info};

/// Reads observation tables and validates them against a [`SeriesSchema`].
#[derive(Debug, Clone, Default)]
pub struct SeriesLoader {
    schema: SeriesSchema,
}

impl SeriesLoader {
    /// Create a loader for the given schema.
    pub const fn new(schema: SeriesSchema) -> Self {
        Self { schema }
    }

    /// Schema in use.
    pub const fn schema(&self) -> &SeriesSchema {
        &self.schema
    }

    /// Load a file, picking the reader from its extension (`.json` or CSV otherwise).
    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<ObservationSeries> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        if is_json {
            self.load_json(path)
        } else {
            self.load_csv(path)
        }
    }

    /// Load a CSV file with a header row.
    pub fn load_csv(&self, path: impl AsRef<Path>) -> Result<ObservationSeries> {
        let path = path.as_ref();
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?;

        let series = self.read_frame(&df)?;
        info!(path = %path.display(), rows = series.len(), "loaded observation series");
        Ok(series)
    }

    /// Convert an in-memory frame into a series.
    ///
    /// # Errors
    /// [`DataError::MissingColumns`] if the schema is not satisfied, before any
    /// row is read.
    pub fn read_frame(&self, df: &DataFrame) -> Result<ObservationSeries> {
        let available: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|c| c.to_string())
            .collect();
        self.schema.validate(&available)?;

        let dates = df.column(&self.schema.date)?.cast(&DataType::String)?;
        let dates = dates.str()?;
        let benchmarks = float_column(df, &self.schema.benchmark)?;

        let mut records = Vec::with_capacity(df.height());
        match &self.schema.fund {
            FundColumns::NavShares { nav, shares } => {
                let navs = float_column(df, nav)?;
                let shares_col = float_column(df, shares)?;
                let navs = navs.f64()?;
                let shares_col = shares_col.f64()?;
                let benchmarks = benchmarks.f64()?;

                for row in 0..df.height() {
                    let date = self.parse_date(row, dates.get(row))?;
                    records.push(Observation::new(
                        date,
                        required(row, nav, navs.get(row))?,
                        required(row, shares, shares_col.get(row))?,
                        required(row, &self.schema.benchmark, benchmarks.get(row))?,
                    ));
                }
            }
            FundColumns::UnitValue(column) => {
                let units = float_column(df, column)?;
                let units = units.f64()?;
                let benchmarks = benchmarks.f64()?;

                for row in 0..df.height() {
                    let date = self.parse_date(row, dates.get(row))?;
                    records.push(Observation::from_unit_value(
                        date,
                        required(row, column, units.get(row))?,
                        required(row, &self.schema.benchmark, benchmarks.get(row))?,
                    ));
                }
            }
        }

        debug!(rows = records.len(), "parsed observation rows");
        Ok(ObservationSeries::new(records)?)
    }

    /// Load a JSON file holding an array of flat records.
    pub fn load_json(&self, path: impl AsRef<Path>) -> Result<ObservationSeries> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let series = self.read_json_str(&text)?;
        info!(path = %path.display(), rows = series.len(), "loaded observation series");
        Ok(series)
    }

    /// Parse a JSON array of flat records.
    ///
    /// Column presence is checked against the first record.
    pub fn read_json_str(&self, text: &str) -> Result<ObservationSeries> {
        let rows: Vec<Map<String, Value>> = serde_json::from_str(text)?;

        if let Some(first) = rows.first() {
            let available: Vec<&String> = first.keys().collect();
            self.schema.validate(&available)?;
        }

        let mut records = Vec::with_capacity(rows.len());
        for (row, fields) in rows.iter().enumerate() {
            let date = self.parse_date(row, fields.get(&self.schema.date).and_then(Value::as_str))?;
            let benchmark = json_number(row, fields, &self.schema.benchmark)?;
            let obs = match &self.schema.fund {
                FundColumns::NavShares { nav, shares } => Observation::new(
                    date,
                    json_number(row, fields, nav)?,
                    json_number(row, fields, shares)?,
                    benchmark,
                ),
                FundColumns::UnitValue(column) => {
                    Observation::from_unit_value(date, json_number(row, fields, column)?, benchmark)
                }
            };
            records.push(obs);
        }

        Ok(ObservationSeries::new(records)?)
    }

    fn parse_date(&self, row: usize, raw: Option<&str>) -> Result<NaiveDate> {
        let raw = required(row, &self.schema.date, raw)?;
        NaiveDate::parse_from_str(raw.trim(), &self.schema.date_format).map_err(|e| {
            DataError::Parse(format!(
                "row {row}: invalid date '{raw}' for format '{}': {e}",
                self.schema.date_format
            ))
        })
    }
}

fn float_column(df: &DataFrame, name: &str) -> Result<Column> {
    Ok(df.column(name)?.cast(&DataType::Float64)?)
}

fn required<T>(row: usize, column: &str, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| DataError::MissingValue {
        row,
        column: column.to_string(),
    })
}

fn json_number(row: usize, fields: &Map<String, Value>, column: &str) -> Result<f64> {
    match fields.get(column) {
        None | Some(Value::Null) => Err(DataError::MissingValue {
            row,
            column: column.to_string(),
        }),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| DataError::Parse(format!("row {row}: '{column}' is not a finite number"))),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| DataError::Parse(format!("row {row}: '{column}' = '{s}': {e}"))),
        Some(other) => Err(DataError::Parse(format!(
            "row {row}: '{column}' has unsupported value {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navspread_engine::EngineError;

    fn frame() -> DataFrame {
        df!(
            "date" => ["2024-01-03", "2024-01-02"],
            "nav" => [102.0, 100.0],
            "shares" => [100.0, 100.0],
            "benchmark" => [1010.0, 1000.0]
        )
        .unwrap()
    }

    #[test]
    fn test_read_frame_sorts_rows() {
        let series = SeriesLoader::default().read_frame(&frame()).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.first_date(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(series.records()[1].nav, 102.0);
    }

    #[test]
    fn test_read_frame_missing_column_is_schema_error() {
        let df = frame().drop("shares").unwrap();
        let err = SeriesLoader::default().read_frame(&df).unwrap_err();

        assert!(err.is_schema_error());
        assert!(err.to_string().contains("shares"));
    }

    #[test]
    fn test_read_frame_integer_columns() {
        let df = df!(
            "date" => ["2024-01-02", "2024-01-03"],
            "nav" => [100i64, 102],
            "shares" => [100i64, 100],
            "benchmark" => [1000i64, 1010]
        )
        .unwrap();

        let series = SeriesLoader::default().read_frame(&df).unwrap();
        assert_eq!(series.records()[1].benchmark, 1010.0);
    }

    #[test]
    fn test_read_frame_bad_date() {
        let df = df!(
            "date" => ["02/01/2024"],
            "nav" => [100.0],
            "shares" => [100.0],
            "benchmark" => [1000.0]
        )
        .unwrap();

        let err = SeriesLoader::default().read_frame(&df).unwrap_err();
        assert!(matches!(err, DataError::Parse(_)));

        let schema = SeriesSchema {
            date_format: "%d/%m/%Y".to_string(),
            ..SeriesSchema::default()
        };
        let series = SeriesLoader::new(schema).read_frame(&df).unwrap();
        assert_eq!(series.first_date(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn test_json_unit_value_schema() {
        let text = r#"[
            {"date": "2024-01-02", "quota": 1.00, "benchmark": 1000},
            {"date": "2024-01-03", "quota": "1.02", "benchmark": 1010}
        ]"#;

        let loader = SeriesLoader::new(SeriesSchema::with_unit_value("quota"));
        let series = loader.read_json_str(text).unwrap();
        assert_eq!(series.records()[1].unit_value(), Ok(1.02));
    }

    #[test]
    fn test_json_missing_value() {
        let text = r#"[
            {"date": "2024-01-02", "nav": 100, "shares": 100, "benchmark": 1000},
            {"date": "2024-01-03", "nav": null, "shares": 100, "benchmark": 1010}
        ]"#;

        let err = SeriesLoader::default().read_json_str(text).unwrap_err();
        assert!(matches!(err, DataError::MissingValue { row: 1, ref column } if column == "nav"));
    }

    #[test]
    fn test_json_empty_array() {
        let err = SeriesLoader::default().read_json_str("[]").unwrap_err();
        assert!(matches!(err, DataError::Engine(EngineError::EmptySeries)));
    }
}
