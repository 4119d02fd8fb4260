//! Human-readable plain-text rendering.

use super::ReportFormatter;
use crate::Result;
use crate::error::DoubleCheckError;
use crate::models::{CheckResult, Record, ViewResult};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use std::io::{self, Write};

/// Writes a fixed-layout text report.
///
/// A header block describes the run, followed by one block per view. Each
/// offending row is printed on its own line as `key: value` pairs in the
/// row's column order.
#[derive(Debug)]
pub struct TextFormatter<W> {
    writer: W,
}

impl<W: Write> TextFormatter<W> {
    /// Creates a formatter writing to `writer`.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_report(&mut self, result: &CheckResult) -> io::Result<()> {
        let w = &mut self.writer;
        writeln!(w, "Database:   {}", result.database)?;
        writeln!(w, "Schema:     {}", result.schema)?;
        writeln!(w, "User:       {}", result.user)?;
        writeln!(w, "Start Time: {}", timestamp(&result.start_time))?;
        writeln!(w, "Duration:   {:?}", result.duration)?;

        for view in &result.view_results {
            write_view(w, view)?;
        }

        w.flush()
    }
}

impl<W: Write> ReportFormatter for TextFormatter<W> {
    fn format(&mut self, result: &CheckResult) -> Result<()> {
        self.write_report(result)
            .map_err(|e| DoubleCheckError::format_failed("writing text report", e))
    }
}

fn write_view<W: Write>(w: &mut W, view: &ViewResult) -> io::Result<()> {
    writeln!(w)?;
    writeln!(w, "---")?;
    writeln!(w, "Name:       {}", view.name)?;
    writeln!(w, "Start Time: {}", timestamp(&view.start_time))?;
    writeln!(w, "Duration:   {:?}", view.duration)?;

    if view.rows.is_empty() {
        return writeln!(w, "Error Rows: None");
    }

    writeln!(w, "Error Rows:")?;
    for row in &view.rows {
        writeln!(w, "  |{}", row_line(row))?;
    }
    Ok(())
}

fn row_line(row: &Record) -> String {
    row.iter()
        .map(|(key, value)| format!(" {key}: {} |", display_value(value)))
        .collect()
}

/// Strings are printed bare, everything else as compact JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn timestamp(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}
