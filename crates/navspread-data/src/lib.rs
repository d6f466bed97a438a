#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/navspread/navspread/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod loader;
pub mod schema;

pub use error::{DataError, Result};
pub use loader::SeriesLoader;
pub use schema::{DEFAULT_DATE_FORMAT, FundColumns, SeriesSchema};

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
