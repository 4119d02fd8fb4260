//! Runs the views of a PostgreSQL schema as data-quality assertions.
//!
//! Each view in the target schema is expected to return zero rows when the
//! data is healthy. Any row it returns describes a violation. The engine
//! discovers the views, runs them, and aggregates the offending rows into a
//! report that can be rendered as JSON or plain text.
//!
//! # Guarantees
//! - Views are only ever read; nothing is written or altered
//! - The caller's connection is borrowed, never opened, closed, or reconfigured
//! - Views run sequentially, one query at a time, in a deterministic order
//!
//! # Example
//! ```rust,no_run
//! use doublecheck_core::{DoubleCheck, ReportFormat};
//! use sqlx::{Connection, PgConnection};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut conn = PgConnection::connect("postgres://localhost/app").await?;
//! let result = DoubleCheck::new(&mut conn, "doublecheck").await?.check_all().await?;
//! ReportFormat::Text.render(&result, std::io::stdout())?;
//! conn.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod decoder;
pub mod engine;
pub mod error;
pub mod format;
pub mod logging;
pub mod models;
pub mod quoting;

// Re-export commonly used types
pub use config::ConnectionConfig;
pub use engine::{DEFAULT_SCHEMA, DoubleCheck};
pub use error::{DoubleCheckError, Result};
pub use format::{JsonFormatter, ReportFormat, ReportFormatter, TextFormatter};
pub use logging::init_logging;
pub use models::{CheckResult, Record, ViewResult};
pub use quoting::quote_identifier;
