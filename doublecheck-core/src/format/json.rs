//! Machine-readable JSON rendering.

use super::ReportFormatter;
use crate::Result;
use crate::error::DoubleCheckError;
use crate::models::CheckResult;
use std::io::Write;

/// Writes the full report as an indented JSON document.
///
/// Every field of the report is reproduced, durations as integer
/// nanoseconds, so the output parses back into an equal [`CheckResult`].
#[derive(Debug)]
pub struct JsonFormatter<W> {
    writer: W,
}

impl<W: Write> JsonFormatter<W> {
    /// Creates a formatter writing to `writer`.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportFormatter for JsonFormatter<W> {
    fn format(&mut self, result: &CheckResult) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, result)
            .map_err(|e| DoubleCheckError::format_failed("JSON serialization", e))?;
        writeln!(self.writer)
            .and_then(|()| self.writer.flush())
            .map_err(|e| DoubleCheckError::format_failed("writing JSON report", e))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::fixtures::{heterogeneous_report, mixed_report};
    use super::*;
    use serde_json::{Value, json};

    fn render(result: &CheckResult) -> String {
        let mut formatter = JsonFormatter::new(Vec::new());
        formatter.format(result).unwrap();
        String::from_utf8(formatter.into_inner()).unwrap()
    }

    #[test]
    fn test_json_round_trip_is_lossless() {
        for report in [mixed_report(), heterogeneous_report()] {
            let output = render(&report);
            let parsed: CheckResult = serde_json::from_str(&output).unwrap();
            assert_eq!(parsed, report);
        }
    }

    #[test]
    fn test_json_field_names() {
        let output = render(&mixed_report());
        let value: Value = serde_json::from_str(&output).unwrap();

        let top: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(
            top,
            vec![
                "database",
                "schema",
                "user",
                "start_time",
                "duration",
                "error_detected",
                "view_results"
            ]
        );

        let view = &value["view_results"][1];
        let view_keys: Vec<&str> = view.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(view_keys, vec!["name", "start_time", "duration", "rows"]);

        assert_eq!(value["error_detected"], json!(true));
        assert_eq!(value["duration"], json!(12_000_000));
        assert_eq!(value["view_results"][0]["rows"], json!([]));
        assert_eq!(
            view["rows"][0],
            json!({"id": 7, "error_message": "something went wrong"})
        );
    }

    #[test]
    fn test_json_is_indented() {
        let output = render(&mixed_report());
        assert!(output.starts_with("{\n  \"database\": \"app_production\",\n"));
        assert!(output.ends_with("}\n"));
    }

    #[test]
    fn test_json_keeps_large_integers_exact() {
        let output = render(&heterogeneous_report());
        assert!(output.contains("9007199254740993"));
    }
}
