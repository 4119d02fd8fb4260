//! Report renderers.
//!
//! Both renderers are pure functions of an already-built [`CheckResult`]:
//! they never touch the database and render identical input identically.

mod json;
mod text;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod fixtures;

pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::Result;
use crate::error::DoubleCheckError;
use crate::models::CheckResult;
use std::io::Write;

/// Renders a check report to a byte sink.
pub trait ReportFormatter {
    /// Writes `result` to the formatter's sink.
    ///
    /// # Errors
    /// Returns [`DoubleCheckError::Format`] if serialization or writing fails.
    fn format(&mut self, result: &CheckResult) -> Result<()>;
}

/// Output formats available for a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Indented JSON document
    #[default]
    Json,
    /// Fixed-layout plain text
    Text,
}

impl ReportFormat {
    /// Renders `result` to `writer` in this format.
    ///
    /// # Errors
    /// Returns [`DoubleCheckError::Format`] if rendering fails.
    pub fn render<W: Write>(self, result: &CheckResult, writer: W) -> Result<()> {
        match self {
            Self::Json => JsonFormatter::new(writer).format(result),
            Self::Text => TextFormatter::new(writer).format(result),
        }
    }

    /// Renders `result` into a string.
    ///
    /// # Errors
    /// Returns [`DoubleCheckError::Format`] if rendering fails.
    pub fn render_to_string(self, result: &CheckResult) -> Result<String> {
        let mut buf = Vec::new();
        self.render(result, &mut buf)?;
        String::from_utf8(buf)
            .map_err(|e| DoubleCheckError::format_failed("report is not UTF-8", e))
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Text => write!(f, "text"),
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = DoubleCheckError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            other => Err(DoubleCheckError::configuration(format!(
                "invalid format '{other}': expected 'json' or 'text'"
            ))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("json".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert_eq!("TEXT".parse::<ReportFormat>().unwrap(), ReportFormat::Text);

        let err = "yaml".parse::<ReportFormat>().unwrap_err();
        assert!(err.to_string().contains("invalid format 'yaml'"));
    }

    #[test]
    fn test_format_display_round_trips() {
        for format in [ReportFormat::Json, ReportFormat::Text] {
            assert_eq!(format.to_string().parse::<ReportFormat>().unwrap(), format);
        }
        assert_eq!(ReportFormat::default(), ReportFormat::Json);
    }
}
