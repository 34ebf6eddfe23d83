//! `version`: prints the greeting banner.

use super::{Command, CommandRegistry, Context, usage_error};
use async_trait::async_trait;
use hedgedb_core::Result;

/// Version shown in the banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Copy, Default)]
pub struct VersionCommand;

#[async_trait]
impl Command for VersionCommand {
    fn name(&self) -> &'static str {
        "version"
    }

    fn description(&self) -> &'static str {
        "Display HedgeDB version"
    }

    async fn run(
        &self,
        _registry: &CommandRegistry,
        ctx: &mut Context<'_>,
        args: &[String],
    ) -> Result<()> {
        if !args.is_empty() {
            return Err(usage_error(ctx, self));
        }
        ctx.line(format!("HedgeDB Version {}", VERSION))?;
        ctx.line("")
    }
}
