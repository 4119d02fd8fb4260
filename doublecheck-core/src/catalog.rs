//! View discovery through `information_schema`.

use crate::Result;
use crate::error::DoubleCheckError;
use sqlx::PgConnection;

/// Lists every view in `schema`, sorted by name.
///
/// Names are ordered bytewise (`COLLATE "C"`) so the order does not depend on
/// the database's default collation or on catalog storage order. A schema
/// without views yields an empty list.
///
/// # Errors
/// Returns [`DoubleCheckError::Discovery`] if the catalog query fails.
pub async fn list_views(conn: &mut PgConnection, schema: &str) -> Result<Vec<String>> {
    tracing::debug!("Discovering views in schema '{}'", schema);

    let views_query = r#"
        SELECT table_name::text AS view_name
        FROM information_schema.views
        WHERE table_schema::text = $1
        ORDER BY table_name::text COLLATE "C"
    "#;

    let views: Vec<String> = sqlx::query_scalar(views_query)
        .bind(schema)
        .fetch_all(conn)
        .await
        .map_err(|e| {
            tracing::error!("Failed to enumerate views in schema '{}': {}", schema, e);
            DoubleCheckError::discovery_failed(schema, e)
        })?;

    tracing::info!("Found {} views in schema '{}'", views.len(), schema);
    Ok(views)
}
