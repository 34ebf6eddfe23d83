//! Command implementations and the shared invocation context.
//!
//! Each command is an independent unit struct implementing [`Command`]. The
//! closed set is declared in [`CommandRegistry::builtin`].
//!
//! # Module Structure
//! - `registry`: name → command table and dispatch
//! - `help`, `version`: banner and usage listing
//! - `connect`: connectivity check
//! - `analyze`, `describe`: table and column listings
//! - `inspect`: aggregate reports

mod analyze;
mod connect;
mod describe;
mod help;
mod inspect;
pub mod registry;
mod version;

pub use analyze::AnalyzeCommand;
pub use connect::ConnectCommand;
pub use describe::DescribeCommand;
pub use help::HelpCommand;
pub use inspect::InspectCommand;
pub use registry::{CommandDescriptor, CommandRegistry, Outcome};
pub use version::VersionCommand;

use async_trait::async_trait;
use hedgedb_core::{ConnectionParameters, Connector, HedgeError, Result, dsn};
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

/// Output formats for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text, one record per line
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Settings for one invocation, derived from the global flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub connect_timeout: Duration,
    pub format: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            connect_timeout: hedgedb_core::connector::DEFAULT_CONNECT_TIMEOUT,
            format: OutputFormat::Text,
        }
    }
}

/// Everything a command may touch while it runs.
pub struct Context<'a> {
    /// Program name shown in usage text
    pub program: &'a str,
    pub settings: &'a Settings,
    pub connector: &'a Connector,
    out: &'a mut (dyn Write + Send),
    err: &'a mut (dyn Write + Send),
}

impl<'a> Context<'a> {
    pub fn new(
        program: &'a str,
        settings: &'a Settings,
        connector: &'a Connector,
        out: &'a mut (dyn Write + Send),
        err: &'a mut (dyn Write + Send),
    ) -> Self {
        Self {
            program,
            settings,
            connector,
            out,
            err,
        }
    }

    /// Writes one line of command output.
    pub fn line(&mut self, text: impl std::fmt::Display) -> Result<()> {
        writeln!(self.out, "{}", text).map_err(|e| HedgeError::io("Failed to write output", e))
    }

    /// Writes `value` as pretty JSON.
    pub fn json<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let text = serde_json::to_string_pretty(value)
            .map_err(|e| HedgeError::serialization("Failed to serialize output", e))?;
        self.line(text)
    }

    /// Writes a one-line diagnostic to the error stream.
    pub fn diagnostic(&mut self, text: impl std::fmt::Display) -> Result<()> {
        writeln!(self.err, "{}", text)
            .map_err(|e| HedgeError::io("Failed to write diagnostic", e))
    }

    fn flush(&mut self) {
        // Nothing useful can be reported if flushing the terminal fails.
        let _ = self.out.flush();
        let _ = self.err.flush();
    }
}

/// A single user-facing operation.
#[async_trait]
pub trait Command: Send + Sync {
    /// Name the command is dispatched under.
    fn name(&self) -> &'static str;

    /// One-line description for the help listing.
    fn description(&self) -> &'static str;

    /// Argument synopsis following the command name, e.g. `<dsn>`.
    fn usage(&self) -> &'static str {
        ""
    }

    /// Runs the command with the arguments that followed its name.
    async fn run(
        &self,
        registry: &CommandRegistry,
        ctx: &mut Context<'_>,
        args: &[String],
    ) -> Result<()>;
}

/// Builds the usage error for `command`.
pub(crate) fn usage_error(ctx: &Context<'_>, command: &dyn Command) -> HedgeError {
    let usage = format!("{} {} {}", ctx.program, command.name(), command.usage());
    HedgeError::usage(usage.trim_end())
}

/// Parses the `<dsn>` argument of a command taking `<dsn>` plus up to
/// `max_extra` further arguments.
pub(crate) fn dsn_argument(
    ctx: &Context<'_>,
    command: &dyn Command,
    args: &[String],
    max_extra: usize,
) -> Result<ConnectionParameters> {
    match args.split_first() {
        Some((descriptor, rest)) if rest.len() <= max_extra => dsn::parse(descriptor),
        _ => Err(usage_error(ctx, command)),
    }
}
