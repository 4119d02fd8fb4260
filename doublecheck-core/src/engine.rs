//! The validation engine.
//!
//! [`DoubleCheck`] snapshots the views of a schema when it is constructed and
//! runs them on demand. Views are executed one at a time, in the requested
//! order, over a connection the engine borrows but never opens, closes, or
//! reconfigures.

use crate::Result;
use crate::catalog::list_views;
use crate::decoder::check_view;
use crate::error::DoubleCheckError;
use crate::models::{CheckResult, ViewResult};
use chrono::Utc;
use sqlx::PgConnection;
use std::time::Instant;

/// Schema used when none is given.
pub const DEFAULT_SCHEMA: &str = "doublecheck";

/// Runs the views of one schema as data-quality assertions.
///
/// # Example
/// ```rust,no_run
/// use doublecheck_core::DoubleCheck;
/// use sqlx::{Connection, PgConnection};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let mut conn = PgConnection::connect("postgres://localhost/app").await?;
/// let mut dc = DoubleCheck::new(&mut conn, "").await?;
/// assert_eq!(dc.schema_name(), "doublecheck");
///
/// let result = dc.check_all().await?;
/// if result.error_detected {
///     println!("{} error rows", result.error_row_count());
/// }
/// # Ok(())
/// # }
/// ```
pub struct DoubleCheck<'c> {
    conn: &'c mut PgConnection,
    schema_name: String,
    views: Vec<String>,
}

impl std::fmt::Debug for DoubleCheck<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DoubleCheck")
            .field("schema_name", &self.schema_name)
            .field("views", &self.views)
            .finish_non_exhaustive()
    }
}

impl<'c> DoubleCheck<'c> {
    /// Creates an engine for `schema_name` and snapshots its views.
    ///
    /// An empty schema name resolves to [`DEFAULT_SCHEMA`]. The view list is
    /// captured once here and is not refreshed by later checks.
    ///
    /// # Errors
    /// Returns [`DoubleCheckError::Construction`] wrapping the discovery
    /// failure if the catalog cannot be queried.
    pub async fn new(conn: &'c mut PgConnection, schema_name: &str) -> Result<Self> {
        let schema_name = resolve_schema_name(schema_name);

        let views = list_views(conn, &schema_name)
            .await
            .map_err(|e| DoubleCheckError::Construction {
                schema: schema_name.clone(),
                source: Box::new(e),
            })?;

        Ok(Self {
            conn,
            schema_name,
            views,
        })
    }

    /// Schema whose views are checked.
    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    /// Views discovered at construction, sorted by name.
    pub fn views(&self) -> &[String] {
        &self.views
    }

    /// Runs the given views in order and aggregates their results.
    ///
    /// Names need not come from [`views`](Self::views); any view in the schema
    /// may be requested. The first failing view aborts the run and no partial
    /// report is returned. Callers that want to keep going past a broken view
    /// can check views one call at a time.
    ///
    /// # Errors
    /// Returns [`DoubleCheckError::Check`] wrapping the session lookup failure
    /// or the first view query failure.
    pub async fn check<S: AsRef<str>>(&mut self, view_names: &[S]) -> Result<CheckResult> {
        let start_time = Utc::now();
        let timer = Instant::now();

        let (database, user) = self
            .session_info()
            .await
            .map_err(|e| DoubleCheckError::check_failed("could not read session metadata", e))?;

        let mut view_results: Vec<ViewResult> = Vec::with_capacity(view_names.len());
        for view in view_names {
            let view: &str = view.as_ref();
            let result = check_view(&mut *self.conn, &self.schema_name, view)
                .await
                .map_err(|e| DoubleCheckError::check_failed(format!("view '{view}'"), e))?;
            view_results.push(result);
        }

        let result = CheckResult::new(
            database,
            self.schema_name.clone(),
            user,
            start_time,
            timer.elapsed(),
            view_results,
        );

        tracing::info!(
            "Checked {} views in schema '{}': {} failing, {} error rows",
            result.view_results.len(),
            result.schema,
            result.failing_views().count(),
            result.error_row_count()
        );

        Ok(result)
    }

    /// Runs every view discovered at construction.
    ///
    /// # Errors
    /// Same as [`check`](Self::check).
    pub async fn check_all(&mut self) -> Result<CheckResult> {
        let views = self.views.clone();
        self.check(views.as_slice()).await
    }

    async fn session_info(&mut self) -> Result<(String, String)> {
        sqlx::query_as::<_, (String, String)>("SELECT current_database()::text, current_user::text")
            .fetch_one(&mut *self.conn)
            .await
            .map_err(|source| DoubleCheckError::SessionLookup { source })
    }
}

/// Resolves an empty schema name to [`DEFAULT_SCHEMA`].
pub fn resolve_schema_name(schema_name: &str) -> String {
    if schema_name.is_empty() {
        DEFAULT_SCHEMA.to_string()
    } else {
        schema_name.to_string()
    }
}
