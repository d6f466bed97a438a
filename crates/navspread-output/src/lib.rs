#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/navspread/navspread/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod format;
pub mod report;
pub mod table;

pub use export::{
    ExportError, ExportFormat, Exporter, WeeklyRowExport, WindowRowExport, export_snapshot,
};
pub use format::{NEGATIVE_COLOR, POSITIVE_COLOR, Tone, format_percent, format_percent_html};
pub use report::{Report, ReportBuilder, ReportError};
pub use table::{
    Labels, SeriesView, WeeklyView, WindowView, day_caption, week_caption, window_caption,
};

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
