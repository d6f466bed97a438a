//! Error types for the derivation engine.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors raised by the engine.
///
/// Only series construction and reference-date resolution fail outright.
/// Arithmetic gaps inside a derivation pass are reported through
/// [`EngineError::DivisionByZero`] at the record level and then degraded to
/// `None` cells by the caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// The observation series has no records.
    #[error("Observation series is empty")]
    EmptySeries,

    /// Two observations share the same date.
    #[error("Duplicate observation date: {0}")]
    DuplicateDate(NaiveDate),

    /// A ratio had a zero denominator.
    #[error("Division by zero computing {field} on {date}")]
    DivisionByZero {
        /// Date of the offending record
        date: NaiveDate,
        /// Name of the quantity being computed
        field: &'static str,
    },

    /// The requested reference date precedes the first observation.
    #[error("Reference date {reference} precedes the first observation on {first}")]
    ReferenceBeforeSeries {
        /// Requested reference date
        reference: NaiveDate,
        /// First date of the series
        first: NaiveDate,
    },
}
