//! Connection configuration for callers that open the database session.
//!
//! The engine itself only borrows an open connection; this module lets glue
//! code build one from a URL, the libpq environment, and explicit overrides.

use crate::Result;
use crate::error::{DoubleCheckError, redact_database_url};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgConnectOptions;
use std::time::Duration;

/// Application name reported to the server by default.
pub const DEFAULT_APPLICATION_NAME: &str = "doublecheck";

/// Configuration for the database session.
///
/// # Security
/// This struct does NOT store passwords. A password is passed separately to
/// [`connect_options`](Self::connect_options) and never logged or serialized.
///
/// # Example
/// ```rust
/// use doublecheck_core::config::ConnectionConfig;
///
/// let config = ConnectionConfig::default()
///     .with_host("localhost".to_string())
///     .with_port(5432)
///     .with_database("app".to_string());
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.to_string(), "ConnectionConfig(localhost:5432/app)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Connection URL used as the base instead of the libpq environment
    pub database_url: Option<String>,
    /// Host override
    pub host: Option<String>,
    /// Port override
    pub port: Option<u16>,
    /// Database name override
    pub database: Option<String>,
    /// Username override (password handled separately)
    pub username: Option<String>,
    /// Server-side limit for each statement
    pub statement_timeout: Option<Duration>,
    /// Name reported in `pg_stat_activity`
    pub application_name: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            host: None,
            port: None,
            database: None,
            username: None,
            statement_timeout: None,
            application_name: DEFAULT_APPLICATION_NAME.to_string(),
        }
    }
}

impl std::fmt::Display for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(url) = &self.database_url {
            return write!(f, "ConnectionConfig({})", redact_database_url(url));
        }
        write!(
            f,
            "ConnectionConfig({}{}{})",
            self.host.as_deref().unwrap_or("<env>"),
            self.port.map_or_else(String::new, |p| format!(":{p}")),
            self.database
                .as_ref()
                .map_or_else(String::new, |db| format!("/{db}"))
        )
        // Username and credentials are intentionally omitted
    }
}

impl ConnectionConfig {
    /// Validates configuration values.
    ///
    /// # Errors
    /// Returns a configuration error if a value is empty or out of range
    pub fn validate(&self) -> Result<()> {
        let explicit = [
            ("database_url", &self.database_url),
            ("host", &self.host),
            ("database", &self.database),
            ("username", &self.username),
        ];
        for (name, value) in explicit {
            if value.as_deref().is_some_and(str::is_empty) {
                return Err(DoubleCheckError::configuration(format!(
                    "{name} cannot be empty"
                )));
            }
        }

        if self.port == Some(0) {
            return Err(DoubleCheckError::configuration(
                "port must be greater than 0",
            ));
        }

        if self.statement_timeout.is_some_and(|t| t.is_zero()) {
            return Err(DoubleCheckError::configuration(
                "statement_timeout must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Builder method to set the connection URL.
    pub fn with_database_url(mut self, url: String) -> Self {
        self.database_url = Some(url);
        self
    }

    /// Builder method to set host.
    pub fn with_host(mut self, host: String) -> Self {
        self.host = Some(host);
        self
    }

    /// Builder method to set port.
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Builder method to set database.
    pub fn with_database(mut self, database: String) -> Self {
        self.database = Some(database);
        self
    }

    /// Builder method to set username.
    pub fn with_username(mut self, username: String) -> Self {
        self.username = Some(username);
        self
    }

    /// Builder method to set the statement timeout.
    pub const fn with_statement_timeout(mut self, timeout: Duration) -> Self {
        self.statement_timeout = Some(timeout);
        self
    }

    /// Resolves connection options.
    ///
    /// Starts from `database_url` when set, otherwise from the libpq
    /// environment (`PGHOST`, `PGPORT`, `PGUSER`, `PGPASSWORD`,
    /// `PGDATABASE`), then applies every explicit override.
    ///
    /// # Errors
    /// Returns a configuration error if the configuration is invalid or the
    /// URL cannot be parsed
    pub fn connect_options(&self, password: Option<&str>) -> Result<PgConnectOptions> {
        self.validate()?;

        let mut options = match &self.database_url {
            Some(url) => url.parse::<PgConnectOptions>().map_err(|e| {
                DoubleCheckError::configuration(format!(
                    "Invalid PostgreSQL connection string '{}': {}",
                    redact_database_url(url),
                    e
                ))
            })?,
            None => PgConnectOptions::new(),
        };

        if let Some(host) = &self.host {
            options = options.host(host);
        }
        if let Some(port) = self.port {
            options = options.port(port);
        }
        if let Some(database) = &self.database {
            options = options.database(database);
        }
        if let Some(username) = &self.username {
            options = options.username(username);
        }
        if let Some(password) = password {
            options = options.password(password);
        }
        if let Some(timeout) = self.statement_timeout {
            // The server reads 0 as "no limit", so sub-millisecond values round up.
            let millis = timeout.as_millis().max(1);
            options = options.options([("statement_timeout", millis.to_string())]);
        }

        Ok(options.application_name(&self.application_name))
    }
}
