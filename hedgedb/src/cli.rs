//! Command-line argument parsing.
//!
//! Global flags are handled by clap; the command name and its arguments are
//! passed through untouched to the [`CommandRegistry`](crate::commands::CommandRegistry).

use crate::commands::{OutputFormat, Settings};
use clap::{Args, Parser};
use std::time::Duration;

/// Command run when none is named.
pub const DEFAULT_COMMAND: &str = "help";

#[derive(Parser, Debug)]
#[command(name = "hedgedb")]
#[command(about = "Database schema inspector")]
#[command(version)]
#[command(long_about = "
HedgeDB - quick, scriptable views of a MySQL schema

Connects with a single descriptor and reads information_schema:
- Connectivity checks
- Tables and storage engines
- Columns with types, keys, and flags
- Engine, charset, collation, and size reports

COMMANDS:
  help                      List commands
  version                   Show the version banner
  connect <dsn>             Test connectivity (PASS / FAIL <code> <message>)
  analyze <dsn>             List tables and engines
  describe <dsn>            List tables with their columns
  inspect <dsn> [report]    Run engines, charsets, collations, sizes reports

DSN FORMAT:
  user:password@host[:port]/database   (port defaults to 3306)
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Seconds to wait for the server to accept a connection
    #[arg(
        long,
        value_name = "SECS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..=300)
    )]
    pub connect_timeout: u64,

    /// Output format for command results
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Command to run (defaults to help)
    pub command: Option<String>,

    /// Arguments for the command
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, help = "Suppress all logging except errors")]
    pub quiet: bool,
}

impl Cli {
    /// The command to dispatch.
    pub fn command_name(&self) -> &str {
        self.command.as_deref().unwrap_or(DEFAULT_COMMAND)
    }

    /// Run settings derived from the global flags.
    pub fn settings(&self) -> Settings {
        Settings {
            connect_timeout: Duration::from_secs(self.connect_timeout),
            format: self.format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_command_defaults_to_help() {
        let cli = Cli::try_parse_from(["hedgedb"]).unwrap();
        assert_eq!(cli.command_name(), "help");
        assert!(cli.args.is_empty());
    }

    #[test]
    fn test_command_and_arguments_pass_through() {
        let cli = Cli::try_parse_from(["hedgedb", "-vv", "analyze", "root:pw@localhost/shop"])
            .unwrap();
        assert_eq!(cli.global.verbose, 2);
        assert_eq!(cli.command_name(), "analyze");
        assert_eq!(cli.args, ["root:pw@localhost/shop"]);
    }

    #[test]
    fn test_global_settings() {
        let cli = Cli::try_parse_from([
            "hedgedb",
            "--connect-timeout",
            "3",
            "--format",
            "json",
            "version",
        ])
        .unwrap();
        let settings = cli.settings();
        assert_eq!(settings.connect_timeout, Duration::from_secs(3));
        assert_eq!(settings.format, OutputFormat::Json);
    }

    #[test]
    fn test_connect_timeout_bounds() {
        assert!(Cli::try_parse_from(["hedgedb", "--connect-timeout", "0", "help"]).is_err());
        assert!(Cli::try_parse_from(["hedgedb", "--connect-timeout", "301", "help"]).is_err());
    }
}
