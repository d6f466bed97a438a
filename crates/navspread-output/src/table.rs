//! Text renderings of the summary tables and the derived series.
//!
//! Each view borrows an engine result plus the display labels and renders it
//! as an ASCII table for the terminal, Markdown for documents, or HTML with
//! sign-coloured cells.

use crate::format::{format_percent, format_percent_html};
use chrono::NaiveDate;
use navspread_engine::{DerivedRecord, Quantity, WeeklyTable, WindowTable};
use serde::{Deserialize, Serialize};
use std::fmt;

const WIDTH: usize = 64;

/// Display names for the two tracked quantities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    /// Fund name.
    pub fund: String,

    /// Benchmark name.
    pub benchmark: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            fund: "Fund".to_string(),
            benchmark: "Benchmark".to_string(),
        }
    }
}

impl Labels {
    /// Create labels.
    pub fn new(fund: impl Into<String>, benchmark: impl Into<String>) -> Self {
        Self {
            fund: fund.into(),
            benchmark: benchmark.into(),
        }
    }

    /// Label for a quantity.
    pub fn get(&self, quantity: Quantity) -> &str {
        match quantity {
            Quantity::Fund => &self.fund,
            Quantity::Benchmark => &self.benchmark,
        }
    }
}

/// Column caption for a window label.
pub fn window_caption(label: &str) -> &str {
    match label {
        "MTD" => "Month",
        "YTD" => "Year",
        "LTM" => "12 months",
        "ITD" => "Since inception",
        "WTD" => "Week",
        other => other,
    }
}

/// Row caption for a weekday slot, e.g. `08.01 - Monday`.
pub fn day_caption(date: NaiveDate) -> String {
    date.format("%d.%m - %A").to_string()
}

/// Row caption for the week total.
pub fn week_caption(iso_week: u32) -> String {
    format!("Week {iso_week}")
}

/// Renders a [`WeeklyTable`].
#[derive(Debug, Clone, Copy)]
pub struct WeeklyView<'a> {
    table: &'a WeeklyTable,
    labels: &'a Labels,
}

impl<'a> WeeklyView<'a> {
    /// Create a view.
    pub const fn new(table: &'a WeeklyTable, labels: &'a Labels) -> Self {
        Self { table, labels }
    }

    /// Caption, day and value cells for every row, including the total.
    pub fn rows(&self) -> Vec<(String, Option<f64>, Option<f64>)> {
        let mut rows: Vec<_> = self
            .table
            .days
            .iter()
            .map(|slot| (day_caption(slot.date), slot.fund, slot.benchmark))
            .collect();

        if let Some(total) = &self.table.total {
            rows.push((week_caption(self.table.iso_week), total.fund, total.benchmark));
        }
        rows
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{} ({}-W{:02})\n",
            week_caption(self.table.iso_week),
            self.table.iso_year,
            self.table.iso_week
        ));
        output.push_str(&"=".repeat(WIDTH));
        output.push('\n');
        output.push_str(&format!(
            "{:<24} {:>18} {:>18}\n",
            "Day", self.labels.fund, self.labels.benchmark
        ));
        output.push_str(&"-".repeat(WIDTH));
        output.push('\n');

        let rows = self.rows();
        for (i, (caption, fund, bench)) in rows.iter().enumerate() {
            if i == self.table.days.len() {
                output.push_str(&"-".repeat(WIDTH));
                output.push('\n');
            }
            output.push_str(&format!(
                "{:<24} {:>18} {:>18}\n",
                caption,
                format_percent(*fund),
                format_percent(*bench)
            ));
        }

        output.push_str(&"=".repeat(WIDTH));
        output.push('\n');
        output
    }

    /// Format as Markdown table.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("## {}\n\n", week_caption(self.table.iso_week)));
        output.push_str(&format!(
            "| Day | {} | {} |\n",
            self.labels.fund, self.labels.benchmark
        ));
        output.push_str("|-----|------:|------:|\n");

        let rows = self.rows();
        for (i, (caption, fund, bench)) in rows.iter().enumerate() {
            let caption = if i == self.table.days.len() {
                format!("**{caption}**")
            } else {
                caption.clone()
            };
            output.push_str(&format!(
                "| {} | {} | {} |\n",
                caption,
                format_percent(*fund),
                format_percent(*bench)
            ));
        }

        output
    }

    /// Format as an HTML table with sign-coloured cells.
    pub fn to_html(&self) -> String {
        let mut output = String::from("<table>\n");
        output.push_str(&format!(
            "<tr><th>Day</th><th>{}</th><th>{}</th></tr>\n",
            self.labels.fund, self.labels.benchmark
        ));
        for (caption, fund, bench) in self.rows() {
            output.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                caption,
                format_percent_html(fund),
                format_percent_html(bench)
            ));
        }
        output.push_str("</table>\n");
        output
    }
}

impl fmt::Display for WeeklyView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ascii_table())
    }
}

/// Renders a [`WindowTable`] with one row per quantity and one column per window.
#[derive(Debug, Clone, Copy)]
pub struct WindowView<'a> {
    table: &'a WindowTable,
    labels: &'a Labels,
}

impl<'a> WindowView<'a> {
    /// Create a view.
    pub const fn new(table: &'a WindowTable, labels: &'a Labels) -> Self {
        Self { table, labels }
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();
        let width = 16 + 17 * self.table.windows.len();

        output.push_str(&format!(
            "\nCumulative Returns (as of {})\n",
            self.table.reference_date
        ));
        output.push_str(&"=".repeat(width));
        output.push('\n');

        output.push_str(&format!("{:<16}", "Period"));
        for window in &self.table.windows {
            output.push_str(&format!(" {:>16}", window_caption(&window.label)));
        }
        output.push('\n');
        output.push_str(&"-".repeat(width));
        output.push('\n');

        for quantity in Quantity::ALL {
            output.push_str(&format!("{:<16}", self.labels.get(quantity)));
            for window in &self.table.windows {
                output.push_str(&format!(" {:>16}", format_percent(window.value(quantity))));
            }
            output.push('\n');
        }

        output.push_str(&"=".repeat(width));
        output.push('\n');
        output
    }

    /// Format as Markdown table.
    pub fn to_markdown(&self) -> String {
        let mut output = String::from("## Cumulative Returns\n\n| Period |");
        for window in &self.table.windows {
            output.push_str(&format!(" {} |", window_caption(&window.label)));
        }
        output.push_str("\n|--------|");
        output.push_str(&"------:|".repeat(self.table.windows.len()));
        output.push('\n');

        for quantity in Quantity::ALL {
            output.push_str(&format!("| {} |", self.labels.get(quantity)));
            for window in &self.table.windows {
                output.push_str(&format!(" {} |", format_percent(window.value(quantity))));
            }
            output.push('\n');
        }

        output
    }

    /// Format as an HTML table with sign-coloured cells.
    pub fn to_html(&self) -> String {
        let mut output = String::from("<table>\n<tr><th>Period</th>");
        for window in &self.table.windows {
            output.push_str(&format!("<th>{}</th>", window_caption(&window.label)));
        }
        output.push_str("</tr>\n");

        for quantity in Quantity::ALL {
            output.push_str(&format!("<tr><td>{}</td>", self.labels.get(quantity)));
            for window in &self.table.windows {
                output.push_str(&format!(
                    "<td>{}</td>",
                    format_percent_html(window.value(quantity))
                ));
            }
            output.push_str("</tr>\n");
        }

        output.push_str("</table>\n");
        output
    }
}

impl fmt::Display for WindowView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ascii_table())
    }
}

/// Renders derived records, one line per date.
#[derive(Debug, Clone, Copy)]
pub struct SeriesView<'a> {
    records: &'a [DerivedRecord],
    labels: &'a Labels,
}

impl<'a> SeriesView<'a> {
    /// Create a view over a slice of records.
    pub const fn new(records: &'a [DerivedRecord], labels: &'a Labels) -> Self {
        Self { records, labels }
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();
        let header = format!(
            "{:<10} {:>12} {:>12} {:>10} {:>10} {:>11} {:>11} {:>9}",
            "Date",
            "Unit value",
            "Benchmark",
            "Fund d/d",
            "Bench d/d",
            format!("{} cum", truncate(&self.labels.fund, 7)),
            format!("{} cum", truncate(&self.labels.benchmark, 7)),
            "Spread"
        );

        output.push_str(&header);
        output.push('\n');
        output.push_str(&"-".repeat(header.len()));
        output.push('\n');

        for rec in self.records {
            output.push_str(&format!(
                "{:<10} {:>12} {:>12} {:>10} {:>10} {:>11} {:>11} {:>9}\n",
                rec.date,
                rec.unit_value.map_or_else(String::new, |v| format!("{v:.6}")),
                rec.benchmark_level
                    .map_or_else(String::new, |v| format!("{v:.2}")),
                format_percent(rec.fund_return),
                format_percent(rec.bench_return),
                format_percent(rec.fund_cum),
                format_percent(rec.bench_cum),
                format_percent(rec.spread)
            ));
        }

        output
    }
}

impl fmt::Display for SeriesView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ascii_table())
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use navspread_engine::{WeekTotal, WeekdaySlot, WindowResult};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn weekly(total: bool) -> WeeklyTable {
        WeeklyTable {
            reference_date: date(10),
            iso_year: 2024,
            iso_week: 2,
            days: (8..=12)
                .map(|d| WeekdaySlot {
                    date: date(d),
                    fund: (d <= 10).then_some(0.01),
                    benchmark: (d <= 10).then_some(-0.005),
                })
                .collect(),
            total: total.then_some(WeekTotal {
                anchor: date(5),
                fund: Some(0.0303),
                benchmark: Some(-0.0149),
            }),
        }
    }

    #[test]
    fn test_day_caption() {
        assert_eq!(day_caption(date(8)), "08.01 - Monday");
    }

    #[test]
    fn test_weekly_rows_include_total() {
        let labels = Labels::new("MKSF", "IBOV");
        let table = weekly(true);
        let rows = WeeklyView::new(&table, &labels).rows();

        assert_eq!(rows.len(), 6);
        assert_eq!(rows[5].0, "Week 2");
        assert_eq!(rows[5].1, Some(0.0303));
        assert_eq!(rows[4].1, None);
    }

    #[test]
    fn test_weekly_ascii_without_total() {
        let labels = Labels::new("MKSF", "IBOV");
        let table = weekly(false);
        let ascii = WeeklyView::new(&table, &labels).to_ascii_table();

        assert!(ascii.contains("MKSF"));
        assert!(ascii.contains("10.01 - Wednesday"));
        assert!(ascii.contains("1.00%"));
        assert!(ascii.contains("-0.50%"));
        assert_eq!(ascii.matches("Week 2").count(), 1);
    }

    #[test]
    fn test_weekly_markdown_bold_total() {
        let labels = Labels::default();
        let table = weekly(true);
        let md = WeeklyView::new(&table, &labels).to_markdown();

        assert!(md.contains("| Day | Fund | Benchmark |"));
        assert!(md.contains("| **Week 2** | 3.03% | -1.49% |"));
    }

    #[test]
    fn test_window_views() {
        let labels = Labels::new("MKSF", "IBOV");
        let table = WindowTable {
            reference_date: date(10),
            windows: vec![
                WindowResult {
                    label: "MTD".to_string(),
                    start: Some(date(2)),
                    end: date(10),
                    fund: Some(0.05),
                    benchmark: Some(-0.02),
                },
                WindowResult {
                    label: "LTM".to_string(),
                    start: None,
                    end: date(10),
                    fund: None,
                    benchmark: None,
                },
            ],
        };
        let view = WindowView::new(&table, &labels);

        let ascii = view.to_ascii_table();
        assert!(ascii.contains("Month"));
        assert!(ascii.contains("12 months"));
        assert!(ascii.contains("5.00%"));

        let md = view.to_markdown();
        assert!(md.contains("| Period | Month | 12 months |"));
        assert!(md.contains("| IBOV | -2.00% |  |"));

        let html = view.to_html();
        assert!(html.contains("#28a745"));
        assert!(html.contains("#dc3545"));
    }

    #[test]
    fn test_window_caption_passthrough() {
        assert_eq!(window_caption("ITD"), "Since inception");
        assert_eq!(window_caption("Custom"), "Custom");
    }
}
