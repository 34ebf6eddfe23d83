//! HedgeDB command-line tool.
//!
//! This library exposes the CLI definition and command registry so they can
//! be exercised without spawning the binary. The entry point is in main.rs.

pub mod cli;
pub mod commands;

pub use cli::Cli;
pub use commands::{Command, CommandRegistry, Context, Outcome, OutputFormat, Settings};
