//! Error types for data loading.

use navspread_engine::EngineError;
use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while loading an observation series.
#[derive(Debug, Error)]
pub enum DataError {
    /// Required columns are absent from the input
    #[error("Schema error: missing required column(s) {missing:?}; available columns: {available:?}")]
    MissingColumns {
        /// Columns the schema requires but the input lacks
        missing: Vec<String>,
        /// Columns the input does provide
        available: Vec<String>,
    },

    /// A required cell is null or absent
    #[error("Missing value in column '{column}' at row {row}")]
    MissingValue {
        /// Zero-based data row
        row: usize,
        /// Column name
        column: String,
    },

    /// Data parsing error
    #[error("Data parsing error: {0}")]
    Parse(String),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The rows did not form a valid series
    #[error("Invalid series: {0}")]
    Engine(#[from] EngineError),
}

impl DataError {
    /// Whether this is a schema validation failure.
    pub const fn is_schema_error(&self) -> bool {
        matches!(self, Self::MissingColumns { .. })
    }
}
