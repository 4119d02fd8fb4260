//! Report data model produced by a check run.
//!
//! All models are serializable and deserializable so a rendered JSON report
//! can be read back without loss.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One offending row returned by a view, keyed by column name.
///
/// Key order follows the view's column order.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Outcome of running a single view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewResult {
    /// View name as stored in the catalog
    pub name: String,
    /// Wall-clock time the query was issued
    pub start_time: DateTime<Utc>,
    /// Time spent executing the query and reading every row
    #[serde(with = "duration_nanos")]
    pub duration: Duration,
    /// Rows returned by the view; empty when the view is clean
    pub rows: Vec<Record>,
}

impl ViewResult {
    /// Whether the view returned no rows.
    pub fn is_clean(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Aggregate report of one check run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Database the session is connected to
    pub database: String,
    /// Schema holding the checked views
    pub schema: String,
    /// Role the session is connected as
    pub user: String,
    /// Wall-clock time the run started
    pub start_time: DateTime<Utc>,
    /// Duration of the whole run
    #[serde(with = "duration_nanos")]
    pub duration: Duration,
    /// True iff at least one view returned a row
    pub error_detected: bool,
    /// Per-view results in the order the views were requested
    pub view_results: Vec<ViewResult>,
}

impl CheckResult {
    /// Builds a report, deriving `error_detected` from the view results.
    pub fn new(
        database: String,
        schema: String,
        user: String,
        start_time: DateTime<Utc>,
        duration: Duration,
        view_results: Vec<ViewResult>,
    ) -> Self {
        let error_detected = view_results.iter().any(|vr| !vr.is_clean());
        Self {
            database,
            schema,
            user,
            start_time,
            duration,
            error_detected,
            view_results,
        }
    }

    /// Whether every view came back clean.
    pub fn is_valid(&self) -> bool {
        !self.error_detected
    }

    /// Views that returned rows, in report order.
    pub fn failing_views(&self) -> impl Iterator<Item = &ViewResult> {
        self.view_results.iter().filter(|vr| !vr.is_clean())
    }

    /// Total number of offending rows across all views.
    pub fn error_row_count(&self) -> usize {
        self.view_results.iter().map(|vr| vr.rows.len()).sum()
    }
}

/// Serializes a [`Duration`] as integer nanoseconds.
pub mod duration_nanos {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    /// Writes the duration as a nanosecond count, saturating at `u64::MAX`.
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        serializer.serialize_u64(nanos)
    }

    /// Reads a nanosecond count.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_nanos)
    }
}
