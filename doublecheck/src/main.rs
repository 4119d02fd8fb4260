//! doublecheck - data validator for PostgreSQL.
//!
//! Every view in the target schema is a data-quality assertion: a healthy
//! database makes it return no rows. This binary lists those views or runs
//! them and prints a JSON or text report.

mod commands;

use clap::{Args, Parser, Subcommand, ValueEnum};
use doublecheck_core::{ConnectionConfig, DEFAULT_SCHEMA, ReportFormat, init_logging};
use std::process::ExitCode;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "doublecheck")]
#[command(about = "doublecheck - data validator")]
#[command(version)]
#[command(long_about = "
doublecheck - data validator for PostgreSQL

Each view in the doublecheck schema is an assertion that returns no rows
when the data is healthy. Any row a view returns is reported as an error.

CONNECTION:
  Settings are read from DATABASE_URL or the libpq environment
  (PGHOST, PGPORT, PGUSER, PGPASSWORD, PGDATABASE) and can be
  overridden with flags.

EXAMPLES:
  doublecheck list --database app
  doublecheck check --format text
  doublecheck check --quiet --fail-on-error --database-url postgres://auditor@db/app
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print version
    Version,
    /// Print views doublecheck will use
    List(ListArgs),
    /// Checks doublecheck views for errors
    Check(CheckArgs),
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase log verbosity (-v, -vv)"
    )]
    pub verbose: u8,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Report format
    #[arg(long, value_enum, default_value_t = FormatArg::Json)]
    pub format: FormatArg,

    /// Only print output if an error is found
    #[arg(long)]
    pub quiet: bool,

    /// Exit with status 2 when any view returns rows
    #[arg(long)]
    pub fail_on_error: bool,
}

#[derive(Debug, Args)]
pub struct ConnectionArgs {
    /// Database connection URL
    #[arg(
        long,
        env = "DATABASE_URL",
        hide_env_values = true,
        help = "Database connection string (credentials will be sanitized in logs)"
    )]
    pub database_url: Option<String>,

    /// Database host
    #[arg(long)]
    pub host: Option<String>,

    /// Database port
    #[arg(long)]
    pub port: Option<u16>,

    /// Database user
    #[arg(long)]
    pub user: Option<String>,

    /// Database password
    #[arg(long, conflicts_with = "password_prompt")]
    pub password: Option<String>,

    /// Prompt for the database password
    #[arg(long)]
    pub password_prompt: bool,

    /// Database name
    #[arg(long)]
    pub database: Option<String>,

    /// Schema that contains doublecheck views
    #[arg(long, default_value = DEFAULT_SCHEMA)]
    pub schema: String,

    /// Per-statement timeout in milliseconds
    #[arg(long, value_name = "MS")]
    pub statement_timeout: Option<u64>,
}

impl ConnectionArgs {
    /// Builds the connection configuration from flags.
    pub fn to_config(&self) -> ConnectionConfig {
        ConnectionConfig {
            database_url: self.database_url.clone(),
            host: self.host.clone(),
            port: self.port,
            database: self.database.clone(),
            username: self.user.clone(),
            statement_timeout: self.statement_timeout.map(Duration::from_millis),
            ..ConnectionConfig::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Json,
    Text,
}

impl From<FormatArg> for ReportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Json => Self::Json,
            FormatArg::Text => Self::Text,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let quiet = matches!(&cli.command, Command::Check(args) if args.quiet);
    if let Err(e) = init_logging(cli.global.verbose, quiet) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    let outcome = match &cli.command {
        Command::Version => {
            println!("doublecheck v{}", env!("CARGO_PKG_VERSION"));
            Ok(commands::Outcome::Clean)
        }
        Command::List(args) => commands::list(args).await,
        Command::Check(args) => commands::check(args).await,
    };

    match outcome {
        Ok(commands::Outcome::Clean) => ExitCode::SUCCESS,
        Ok(commands::Outcome::ErrorsDetected) => ExitCode::from(2),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_check_defaults() {
        let cli = Cli::try_parse_from(["doublecheck", "check"]).unwrap();
        let Command::Check(args) = cli.command else {
            panic!("expected check command");
        };
        assert_eq!(args.format, FormatArg::Json);
        assert!(!args.quiet);
        assert!(!args.fail_on_error);
        assert_eq!(args.connection.schema, "doublecheck");
    }

    #[test]
    fn test_check_flags() {
        let cli = Cli::try_parse_from([
            "doublecheck",
            "-vv",
            "check",
            "--format",
            "text",
            "--quiet",
            "--host",
            "db.internal",
            "--port",
            "5433",
            "--user",
            "auditor",
            "--database",
            "app",
            "--schema",
            "quality checks",
            "--statement-timeout",
            "2500",
        ])
        .unwrap();

        assert_eq!(cli.global.verbose, 2);
        let Command::Check(args) = cli.command else {
            panic!("expected check command");
        };
        assert_eq!(ReportFormat::from(args.format), ReportFormat::Text);
        assert!(args.quiet);

        let config = args.connection.to_config();
        assert_eq!(config.host.as_deref(), Some("db.internal"));
        assert_eq!(config.port, Some(5433));
        assert_eq!(config.username.as_deref(), Some("auditor"));
        assert_eq!(config.database.as_deref(), Some("app"));
        assert_eq!(config.statement_timeout, Some(Duration::from_millis(2500)));
        assert_eq!(args.connection.schema, "quality checks");
    }

    #[test]
    fn test_invalid_format_is_rejected() {
        let result = Cli::try_parse_from(["doublecheck", "check", "--format", "yaml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_password_flags_conflict() {
        let result = Cli::try_parse_from([
            "doublecheck",
            "list",
            "--password",
            "x",
            "--password-prompt",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_version_command_parses() {
        let cli = Cli::try_parse_from(["doublecheck", "version"]).unwrap();
        assert!(matches!(cli.command, Command::Version));
    }
}
