//! navspread CLI binary.
//!
//! Loads a fund/benchmark series and prints or exports its performance tables.

mod settings;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use navspread::analyze_series;
use navspread_data::SeriesLoader;
use navspread_engine::{
    ObservationSeries, PeriodWindowResolver, Quantity, ReturnCalculator, WindowRule,
};
use navspread_output::{
    ExportFormat, Labels, Report, SeriesView, WeeklyView, WindowView, export_snapshot,
    format_percent,
};
use settings::{AppConfig, OutputFormat};
use std::path::PathBuf;
use std::process;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "navspread")]
#[command(about = "Fund versus benchmark performance attribution", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./navspread.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Observation file (CSV, or JSON by extension); overrides data.path
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Reference date (YYYY-MM-DD); defaults to the last observation
    #[arg(long, global = true, value_parser = parse_date)]
    as_of: Option<NaiveDate>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the weekly attribution table and the period window table
    Summary {
        /// Output format; overrides output.format
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Print the derived series
    Series {
        /// Only the last N dates
        #[arg(long)]
        tail: Option<usize>,
    },

    /// Return of both quantities between two dates
    Window {
        /// Start date; resolves to the latest observation on or before it
        #[arg(long, value_parser = parse_date)]
        from: NaiveDate,

        /// End date; resolves to the latest observation on or before it
        #[arg(long, value_parser = parse_date)]
        to: NaiveDate,
    },

    /// Write the derived series and both tables to files
    Export {
        /// Target directory; overrides output.export_dir
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// csv, json or pretty-json
        #[arg(long, default_value = "csv", value_parser = parse_export_format)]
        format: ExportFormat,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // Tables go to stdout; keep logs on stderr.
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let series = load_series(&config, cli.data)?;
    let labels = config.labels();

    match cli.command {
        Commands::Summary { format } => {
            let snapshot = analyze_series(&series, cli.as_of, config.snapshot_options())?;
            match format.unwrap_or(config.output.format) {
                OutputFormat::Text => {
                    println!("{}", WeeklyView::new(&snapshot.weekly, &labels));
                    println!("{}", WindowView::new(&snapshot.windows, &labels));
                }
                OutputFormat::Markdown => {
                    println!("{}", WeeklyView::new(&snapshot.weekly, &labels).to_markdown());
                    println!("{}", WindowView::new(&snapshot.windows, &labels).to_markdown());
                }
                OutputFormat::Json => {
                    println!("{}", Report::from_snapshot(&snapshot, labels)?.to_json()?);
                }
            }
        }

        Commands::Series { tail } => {
            let snapshot = analyze_series(&series, cli.as_of, config.snapshot_options())?;
            let upto = snapshot
                .derived
                .records()
                .partition_point(|r| r.date <= snapshot.reference_date);
            let records = &snapshot.derived.records()[..upto];
            let shown = tail.map_or(records, |n| &records[records.len().saturating_sub(n)..]);
            print!("{}", SeriesView::new(shown, &labels));
        }

        Commands::Window { from, to } => {
            print_window(&series, &labels, from, to)?;
        }

        Commands::Export { out_dir, format } => {
            let snapshot = analyze_series(&series, cli.as_of, config.snapshot_options())?;
            let dir = out_dir
                .or_else(|| config.output.export_dir.clone())
                .unwrap_or_else(|| PathBuf::from("."));

            let written = export_snapshot(&snapshot, &dir, format)?;
            for path in &written {
                println!("{}", path.display());
            }
            info!(files = written.len(), dir = %dir.display(), "export complete");
        }
    }

    Ok(())
}

fn load_series(
    config: &AppConfig,
    data: Option<PathBuf>,
) -> Result<ObservationSeries, Box<dyn std::error::Error>> {
    let path = data
        .or_else(|| config.data.path.clone())
        .ok_or("no observation file: pass --data or set data.path in the configuration")?;

    Ok(SeriesLoader::new(config.schema()).load_path(&path)?)
}

fn print_window(
    series: &ObservationSeries,
    labels: &Labels,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<(), Box<dyn std::error::Error>> {
    let derived = ReturnCalculator::new().derive(series);
    let resolver = PeriodWindowResolver::new();

    let end = derived
        .latest_on_or_before(to)
        .ok_or_else(|| format!("no observation on or before {to}"))?;
    let start = resolver
        .resolve_start(&derived, WindowRule::Since(from), end)
        .ok_or_else(|| format!("no observation on or before {from}"))?;

    let result = resolver.evaluate_range(&derived, &format!("{from}..{to}"), start, end);

    println!("Window {start} to {end}");
    println!("{}", "-".repeat(40));
    for quantity in Quantity::ALL {
        println!(
            "{:<24} {:>14}",
            labels.get(quantity),
            format_percent(result.value(quantity))
        );
    }
    println!("{:<24} {:>14}", "Spread", format_percent(result.spread()));
    Ok(())
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

fn parse_export_format(s: &str) -> Result<ExportFormat, String> {
    s.parse::<ExportFormat>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_window_command() {
        let cli = Cli::try_parse_from([
            "navspread",
            "--data",
            "nav.csv",
            "window",
            "--from",
            "2024-01-02",
            "--to",
            "2024-03-28",
        ])
        .unwrap();

        assert_eq!(cli.data, Some(PathBuf::from("nav.csv")));
        match cli.command {
            Commands::Window { from, to } => {
                assert_eq!(from, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
                assert_eq!(to, NaiveDate::from_ymd_opt(2024, 3, 28).unwrap());
            }
            _ => panic!("expected window command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "navspread",
            "summary",
            "--format",
            "json",
            "--as-of",
            "2024-06-30",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.as_of, NaiveDate::from_ymd_opt(2024, 6, 30));
        assert!(matches!(
            cli.command,
            Commands::Summary {
                format: Some(OutputFormat::Json)
            }
        ));
    }

    #[test]
    fn test_export_format_parsing() {
        let cli = Cli::try_parse_from(["navspread", "export", "--format", "pretty-json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Export {
                out_dir: None,
                format: ExportFormat::PrettyJson
            }
        ));

        assert!(Cli::try_parse_from(["navspread", "export", "--format", "xml"]).is_err());
        assert!(Cli::try_parse_from(["navspread", "--as-of", "30/06/2024", "series"]).is_err());
    }
}
