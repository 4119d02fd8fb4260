//! `list` and `check` command implementations.
//!
//! The connection is opened here, lent to the engine, and closed once the
//! command is done with it.

use crate::{CheckArgs, ConnectionArgs, ListArgs};
use anyhow::Context;
use doublecheck_core::{CheckResult, DoubleCheck, DoubleCheckError, ReportFormat};
use sqlx::{Connection, PgConnection};
use std::io::Write;
use tracing::{info, warn};
use zeroize::Zeroizing;

/// How a successful command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// Nothing to report, or reporting was all that was asked for
    Clean,
    /// Views returned rows and `--fail-on-error` was given
    ErrorsDetected,
}

/// Prints the views the engine discovered, one per line.
pub(crate) async fn list(args: &ListArgs) -> anyhow::Result<Outcome> {
    let mut conn = connect(&args.connection).await?;
    let listed = print_views(&mut conn, &args.connection.schema).await;
    close(conn).await;
    listed.map(|()| Outcome::Clean)
}

/// Checks every discovered view and renders the report.
pub(crate) async fn check(args: &CheckArgs) -> anyhow::Result<Outcome> {
    let mut conn = connect(&args.connection).await?;
    let checked = run_check(&mut conn, args).await;
    close(conn).await;
    checked
}

async fn print_views(conn: &mut PgConnection, schema: &str) -> anyhow::Result<()> {
    let dc = DoubleCheck::new(conn, schema)
        .await
        .context("Unable to initialize doublecheck")?;

    let mut out = std::io::stdout().lock();
    for view in dc.views() {
        writeln!(out, "{view}").context("Failed to write view list")?;
    }
    Ok(())
}

async fn run_check(conn: &mut PgConnection, args: &CheckArgs) -> anyhow::Result<Outcome> {
    let mut dc = DoubleCheck::new(conn, &args.connection.schema)
        .await
        .context("Unable to initialize doublecheck")?;

    let result = dc.check_all().await.context("Check failed")?;

    let (print, outcome) = decide(&result, args.quiet, args.fail_on_error);
    if print {
        ReportFormat::from(args.format)
            .render(&result, std::io::stdout().lock())
            .context("Failed to format results")?;
    } else {
        info!("No errors detected; output suppressed");
    }
    Ok(outcome)
}

/// Decides whether a finished report is printed and how the command ends.
///
/// `quiet` suppresses clean reports only; `fail_on_error` turns a dirty
/// report into [`Outcome::ErrorsDetected`].
fn decide(result: &CheckResult, quiet: bool, fail_on_error: bool) -> (bool, Outcome) {
    let print = !quiet || result.error_detected;
    let outcome = if fail_on_error && result.error_detected {
        Outcome::ErrorsDetected
    } else {
        Outcome::Clean
    };
    (print, outcome)
}

async fn connect(args: &ConnectionArgs) -> anyhow::Result<PgConnection> {
    let config = args.to_config();
    info!("Target: {}", config);

    let password = read_password(args)?;
    let options = config
        .connect_options(password.as_deref().map(String::as_str))
        .context("Error loading config")?;

    PgConnection::connect_with(&options)
        .await
        .map_err(DoubleCheckError::connection_failed)
        .context("Unable to connect to PostgreSQL")
}

fn read_password(args: &ConnectionArgs) -> anyhow::Result<Option<Zeroizing<String>>> {
    if args.password_prompt {
        let password = rpassword::prompt_password("Password: ").context("Failed to read password")?;
        return Ok(Some(Zeroizing::new(password)));
    }
    Ok(args.password.clone().map(Zeroizing::new))
}

async fn close(conn: PgConnection) {
    if let Err(e) = conn.close().await {
        warn!("Failed to close database connection cleanly: {}", e);
    }
}
