//! Cell formatting and sign tones.

use serde::{Deserialize, Serialize};

/// Colour used for non-negative figures.
pub const POSITIVE_COLOR: &str = "#28a745";

/// Colour used for negative figures.
pub const NEGATIVE_COLOR: &str = "#dc3545";

/// Sign classification of a displayed figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    /// Zero or above.
    Positive,
    /// Below zero.
    Negative,
    /// No value.
    Neutral,
}

impl Tone {
    /// Classify an optional figure.
    pub fn of(value: Option<f64>) -> Self {
        match value {
            Some(v) if v >= 0.0 => Self::Positive,
            Some(v) if v < 0.0 => Self::Negative,
            _ => Self::Neutral,
        }
    }

    /// Hex colour for the tone, if it has one.
    pub const fn color(&self) -> Option<&'static str> {
        match self {
            Self::Positive => Some(POSITIVE_COLOR),
            Self::Negative => Some(NEGATIVE_COLOR),
            Self::Neutral => None,
        }
    }
}

/// A fraction as a two-decimal percentage; empty for `None`.
///
/// ```
/// use navspread_output::format_percent;
///
/// assert_eq!(format_percent(Some(0.0123)), "1.23%");
/// assert_eq!(format_percent(None), "");
/// ```
pub fn format_percent(value: Option<f64>) -> String {
    value.map_or_else(String::new, |v| format!("{:.2}%", v * 100.0))
}

/// A percentage wrapped in a coloured HTML span; empty for `None`.
pub fn format_percent_html(value: Option<f64>) -> String {
    match Tone::of(value).color() {
        Some(color) => format!(
            "<span style=\"color: {color}; font-weight: 500;\">{}</span>",
            format_percent(value)
        ),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some(0.02), "2.00%")]
    #[case(Some(-0.00456), "-0.46%")]
    #[case(Some(0.0), "0.00%")]
    #[case(None, "")]
    fn test_format_percent(#[case] value: Option<f64>, #[case] expected: &str) {
        assert_eq!(format_percent(value), expected);
    }

    #[rstest]
    #[case(Some(0.01), Tone::Positive)]
    #[case(Some(0.0), Tone::Positive)]
    #[case(Some(-0.01), Tone::Negative)]
    #[case(None, Tone::Neutral)]
    #[case(Some(f64::NAN), Tone::Neutral)]
    fn test_tone(#[case] value: Option<f64>, #[case] expected: Tone) {
        assert_eq!(Tone::of(value), expected);
    }

    #[test]
    fn test_format_percent_html() {
        let html = format_percent_html(Some(-0.05));
        assert!(html.contains(NEGATIVE_COLOR));
        assert!(html.contains("-5.00%"));
        assert_eq!(format_percent_html(None), "");
    }
}
