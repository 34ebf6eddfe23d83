//! Database schema inspector.
//!
//! Reads a MySQL schema through `information_schema` and prints tables,
//! columns, and aggregate reports in a scriptable format.
//!
//! # Guarantees
//! - Read-only catalog access only
//! - No credentials logged or echoed
//! - One session per invocation, nothing persisted

use clap::Parser;
use hedgedb::{Cli, CommandRegistry, Context};
use hedgedb_core::{Connector, MySqlDriver, init_logging};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose, cli.global.quiet)?;

    let settings = cli.settings();
    let connector =
        Connector::new(MySqlDriver::new()).with_connect_timeout(settings.connect_timeout);
    let registry = CommandRegistry::builtin()?;

    let program = std::env::args().next().unwrap_or_else(|| "hedgedb".to_string());
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let mut ctx = Context::new(&program, &settings, &connector, &mut stdout, &mut stderr);

    let outcome = registry
        .dispatch(cli.command_name(), &cli.args, &mut ctx)
        .await;

    Ok(outcome.into())
}
