//! Shared reports for formatter tests.

use crate::models::{CheckResult, Record, ViewResult};
use chrono::{TimeZone, Utc};
use serde_json::json;
use std::time::Duration;

fn record(value: serde_json::Value) -> Record {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

/// A report with one dirty view between two clean ones.
pub(super) fn mixed_report() -> CheckResult {
    let start = Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap();
    CheckResult::new(
        "app_production".to_string(),
        "doublecheck".to_string(),
        "auditor".to_string(),
        start,
        Duration::from_millis(12),
        vec![
            ViewResult {
                name: "syntax error".to_string(),
                start_time: start,
                duration: Duration::from_millis(3),
                rows: vec![],
            },
            ViewResult {
                name: "with_multiple_errors".to_string(),
                start_time: start,
                duration: Duration::from_millis(4),
                rows: vec![
                    record(json!({"id": 7, "error_message": "something went wrong"})),
                    record(json!({"id": 42, "error_message": "something else went wrong"})),
                ],
            },
            ViewResult {
                name: "without_errors".to_string(),
                start_time: start,
                duration: Duration::from_millis(2),
                rows: vec![],
            },
        ],
    )
}

/// A report whose single row holds every JSON value kind.
pub(super) fn heterogeneous_report() -> CheckResult {
    let start = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
    CheckResult::new(
        "app".to_string(),
        "quality checks".to_string(),
        "postgres".to_string(),
        start,
        Duration::new(1, 500_000_000),
        vec![ViewResult {
            name: "orders_without_customer".to_string(),
            start_time: start,
            duration: Duration::from_micros(750),
            rows: vec![record(json!({
                "order_id": 9_007_199_254_740_993_i64,
                "total": 19.95,
                "flagged": true,
                "note": null,
                "tags": ["late", "unpaid"],
                "customer": {"id": 3, "name": "Zoë \"Z\" O'Hara"}
            }))],
        }],
    )
}
