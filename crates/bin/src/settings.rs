//! Application configuration.
//!
//! Settings come from an optional TOML file overlaid with `NAVSPREAD_*`
//! environment variables (`NAVSPREAD_DATA__PATH`, `NAVSPREAD_WINDOWS__TRAILING_DAYS`, ...).
//! Every field has a default so an empty file, or none at all, is valid.

use clap::ValueEnum;
use config::{Config, Environment, File};
use navspread_data::{DEFAULT_DATE_FORMAT, FundColumns, SeriesSchema};
use navspread_engine::{SnapshotOptions, TRAILING_YEAR_DAYS};
use navspread_output::Labels;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const FILE_NAME: &str = "navspread.toml";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// How `summary` prints its tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum OutputFormat {
    #[default]
    Text,
    Markdown,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct DataConfig {
    pub(crate) path: Option<PathBuf>,
    pub(crate) date_column: String,
    pub(crate) date_format: String,
    pub(crate) nav_column: String,
    pub(crate) shares_column: String,
    /// Pre-divided fund value; replaces `nav_column / shares_column` when set.
    pub(crate) unit_value_column: Option<String>,
    pub(crate) benchmark_column: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: None,
            date_column: "date".to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            nav_column: "nav".to_string(),
            shares_column: "shares".to_string(),
            unit_value_column: None,
            benchmark_column: "benchmark".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct LabelsConfig {
    pub(crate) fund: String,
    pub(crate) benchmark: String,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        let labels = Labels::default();
        Self {
            fund: labels.fund,
            benchmark: labels.benchmark,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct WindowsConfig {
    pub(crate) trailing_days: i64,
}

impl Default for WindowsConfig {
    fn default() -> Self {
        Self {
            trailing_days: TRAILING_YEAR_DAYS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct OutputConfig {
    pub(crate) format: OutputFormat,
    pub(crate) export_dir: Option<PathBuf>,
}

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub(crate) data: DataConfig,
    pub(crate) labels: LabelsConfig,
    pub(crate) windows: WindowsConfig,
    pub(crate) output: OutputConfig,
}

impl AppConfig {
    /// Load from `explicit` if given, else the first existing default location.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => default_locations().into_iter().find(|p| p.is_file()),
        };
        Self::load_from(path.as_deref())
    }

    /// Load `path` (required when given) plus the environment overlay.
    pub(crate) fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            tracing::debug!(path = %path.display(), "reading configuration file");
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix("NAVSPREAD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the loader or engine cannot use.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let data = &self.data;
        let mut columns = vec![
            ("data.date_column", data.date_column.as_str()),
            ("data.date_format", data.date_format.as_str()),
            ("data.benchmark_column", data.benchmark_column.as_str()),
        ];
        match &data.unit_value_column {
            Some(col) => columns.push(("data.unit_value_column", col.as_str())),
            None => {
                columns.push(("data.nav_column", data.nav_column.as_str()));
                columns.push(("data.shares_column", data.shares_column.as_str()));
            }
        }

        if let Some((key, _)) = columns.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!("{key} must not be empty")));
        }
        if self.windows.trailing_days <= 0 {
            return Err(ConfigError::Invalid(format!(
                "windows.trailing_days must be positive, got {}",
                self.windows.trailing_days
            )));
        }
        Ok(())
    }

    /// Input schema described by the `[data]` section.
    pub(crate) fn schema(&self) -> SeriesSchema {
        let data = &self.data;
        let fund = match &data.unit_value_column {
            Some(col) => FundColumns::UnitValue(col.clone()),
            None => FundColumns::NavShares {
                nav: data.nav_column.clone(),
                shares: data.shares_column.clone(),
            },
        };
        SeriesSchema {
            date: data.date_column.clone(),
            date_format: data.date_format.clone(),
            fund,
            benchmark: data.benchmark_column.clone(),
        }
    }

    pub(crate) fn labels(&self) -> Labels {
        Labels::new(self.labels.fund.clone(), self.labels.benchmark.clone())
    }

    pub(crate) const fn snapshot_options(&self) -> SnapshotOptions {
        SnapshotOptions {
            trailing_days: self.windows.trailing_days,
        }
    }
}

fn default_locations() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("navspread").join("config.toml"));
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_toml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.schema(), SeriesSchema::default());
        assert_eq!(config.snapshot_options(), SnapshotOptions::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_toml(
            r#"
            [data]
            path = "fund.csv"
            unit_value_column = "quota"
            benchmark_column = "ibov"

            [labels]
            fund = "MKSF"
            "#,
        );

        let config = AppConfig::load_from(Some(file.path())).unwrap();

        assert_eq!(config.data.path, Some(PathBuf::from("fund.csv")));
        assert_eq!(config.data.date_column, "date");
        assert_eq!(config.labels.fund, "MKSF");
        assert_eq!(config.labels.benchmark, "Benchmark");
        assert_eq!(config.windows.trailing_days, 365);
        assert_eq!(
            config.schema().fund,
            FundColumns::UnitValue("quota".to_string())
        );
    }

    #[test]
    fn test_output_section() {
        let file = write_toml(
            r#"
            [output]
            format = "markdown"
            export_dir = "reports"
            "#,
        );

        let config = AppConfig::load_from(Some(file.path())).unwrap();
        assert_eq!(config.output.format, OutputFormat::Markdown);
        assert_eq!(config.output.export_dir, Some(PathBuf::from("reports")));
    }

    #[test]
    fn test_rejects_empty_column() {
        let file = write_toml("[data]\nbenchmark_column = \"  \"\n");
        let err = AppConfig::load_from(Some(file.path())).unwrap_err();

        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("data.benchmark_column"));
    }

    #[test]
    fn test_rejects_non_positive_trailing_days() {
        let file = write_toml("[windows]\ntrailing_days = 0\n");
        let err = AppConfig::load_from(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("trailing_days"));
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load_from(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }
}
