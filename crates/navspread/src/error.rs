//! Workspace-wide error type.

use navspread_data::DataError;
use navspread_engine::EngineError;
use navspread_output::{ExportError, ReportError};
use thiserror::Error;

/// Any failure from loading, computing or writing results.
#[derive(Debug, Error)]
pub enum Error {
    /// Input could not be read or did not match the schema.
    #[error(transparent)]
    Data(#[from] DataError),

    /// The engine rejected the series or the reference date.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Export failed.
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Report generation failed.
    #[error(transparent)]
    Report(#[from] ReportError),
}

impl Error {
    /// Whether the input table is missing required columns.
    pub const fn is_schema_error(&self) -> bool {
        matches!(self, Self::Data(DataError::MissingColumns { .. }))
    }
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
