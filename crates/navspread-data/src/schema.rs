//! Input column schema.

use crate::error::{DataError, Result};
use serde::{Deserialize, Serialize};

/// Default date format for text dates.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Where the fund side of each row comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundColumns {
    /// Net asset value and shares outstanding, divided per row.
    NavShares {
        /// Net asset value column
        nav: String,
        /// Shares outstanding column
        shares: String,
    },

    /// A pre-divided per-unit value column.
    UnitValue(String),
}

/// Column names and parsing rules for an observation table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesSchema {
    /// Date column.
    pub date: String,

    /// `chrono` format string for text dates.
    pub date_format: String,

    /// Fund value columns.
    pub fund: FundColumns,

    /// Benchmark level column.
    pub benchmark: String,
}

impl Default for SeriesSchema {
    fn default() -> Self {
        Self {
            date: "date".to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            fund: FundColumns::NavShares {
                nav: "nav".to_string(),
                shares: "shares".to_string(),
            },
            benchmark: "benchmark".to_string(),
        }
    }
}

impl SeriesSchema {
    /// Schema for tables carrying a pre-divided unit value column.
    pub fn with_unit_value(column: impl Into<String>) -> Self {
        Self {
            fund: FundColumns::UnitValue(column.into()),
            ..Self::default()
        }
    }

    /// Columns the input must contain.
    pub fn required_columns(&self) -> Vec<&str> {
        let mut cols = vec![self.date.as_str()];
        match &self.fund {
            FundColumns::NavShares { nav, shares } => {
                cols.push(nav.as_str());
                cols.push(shares.as_str());
            }
            FundColumns::UnitValue(col) => cols.push(col.as_str()),
        }
        cols.push(self.benchmark.as_str());
        cols
    }

    /// Check that every required column is present.
    ///
    /// # Errors
    /// Returns [`DataError::MissingColumns`] naming every absent column.
    pub fn validate<S: AsRef<str>>(&self, available: &[S]) -> Result<()> {
        let missing: Vec<String> = self
            .required_columns()
            .into_iter()
            .filter(|req| !available.iter().any(|a| a.as_ref() == *req))
            .map(str::to_string)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DataError::MissingColumns {
                missing,
                available: available.iter().map(|a| a.as_ref().to_string()).collect(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_required_columns() {
        let schema = SeriesSchema::default();
        assert_eq!(
            schema.required_columns(),
            vec!["date", "nav", "shares", "benchmark"]
        );
    }

    #[test]
    fn test_unit_value_required_columns() {
        let schema = SeriesSchema::with_unit_value("quota");
        assert_eq!(schema.required_columns(), vec!["date", "quota", "benchmark"]);
    }

    #[test]
    fn test_validate_lists_all_missing() {
        let schema = SeriesSchema::default();
        let err = schema.validate(&["date", "nav"]).unwrap_err();

        match err {
            DataError::MissingColumns { missing, available } => {
                assert_eq!(missing, vec!["shares", "benchmark"]);
                assert_eq!(available, vec!["date", "nav"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_ignores_extra_columns() {
        let schema = SeriesSchema::default();
        assert!(
            schema
                .validate(&["date", "nav", "shares", "benchmark", "comment"])
                .is_ok()
        );
    }
}
