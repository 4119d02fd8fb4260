//! Runs a single view and decodes its rows without knowing its columns.
//!
//! Each row is projected through `row_to_json`, so every view, whatever its
//! column list, comes back as one JSON object per row. Rows are buffered in
//! the order PostgreSQL returns them; check views are expected to return few
//! or no rows.

use crate::Result;
use crate::error::DoubleCheckError;
use crate::models::{Record, ViewResult};
use crate::quoting::qualified_name;
use chrono::Utc;
use sqlx::PgConnection;
use sqlx::types::Json;
use std::time::Instant;

/// Builds the query that returns every row of `schema.view` as a JSON object.
pub fn view_query(schema: &str, view: &str) -> String {
    format!(
        "SELECT row_to_json(t) FROM {} AS t",
        qualified_name(schema, view)
    )
}

/// Executes `schema.view` and collects every row it returns.
///
/// The timing covers query execution and reading all rows.
///
/// # Errors
/// Returns [`DoubleCheckError::Query`] if the view does not exist, cannot be
/// read, or its own SQL fails at execution time.
pub async fn check_view(conn: &mut PgConnection, schema: &str, view: &str) -> Result<ViewResult> {
    let sql = view_query(schema, view);
    tracing::debug!("Checking view '{}.{}'", schema, view);

    let start_time = Utc::now();
    let timer = Instant::now();

    let rows: Vec<Json<Record>> = sqlx::query_scalar(&sql)
        .fetch_all(conn)
        .await
        .map_err(|e| {
            tracing::error!("Query of view '{}' failed: {}", view, e);
            DoubleCheckError::query_failed(view, e)
        })?;

    let duration = timer.elapsed();
    let rows: Vec<Record> = rows.into_iter().map(|Json(record)| record).collect();

    if rows.is_empty() {
        tracing::debug!("View '{}' is clean ({:?})", view, duration);
    } else {
        tracing::warn!("View '{}' returned {} error rows", view, rows.len());
    }

    Ok(ViewResult {
        name: view.to_string(),
        start_time,
        duration,
        rows,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_view_query_quotes_both_parts() {
        assert_eq!(
            view_query("doublecheck", "syntax error"),
            r#"SELECT row_to_json(t) FROM "doublecheck"."syntax error" AS t"#
        );
    }

    #[test]
    fn test_view_query_escapes_quotes() {
        assert_eq!(
            view_query("my \"schema\"", "v"),
            r#"SELECT row_to_json(t) FROM "my ""schema"""."v" AS t"#
        );
    }
}
