//! `help`: lists registered commands, or shows one command's usage.

use super::{Command, CommandRegistry, Context, usage_error};
use async_trait::async_trait;
use hedgedb_core::{HedgeError, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct HelpCommand;

#[async_trait]
impl Command for HelpCommand {
    fn name(&self) -> &'static str {
        "help"
    }

    fn description(&self) -> &'static str {
        "Display help message"
    }

    fn usage(&self) -> &'static str {
        "[command]"
    }

    async fn run(
        &self,
        registry: &CommandRegistry,
        ctx: &mut Context<'_>,
        args: &[String],
    ) -> Result<()> {
        match args {
            [] => {
                ctx.line("Usage:")?;
                ctx.line(format!("  {} command [argument]", ctx.program))?;
                ctx.line("")?;
                ctx.line("Commands:")?;
                for descriptor in registry.descriptors() {
                    ctx.line(format!(
                        "  {:<16} {}",
                        descriptor.name, descriptor.description
                    ))?;
                }
                Ok(())
            }
            [topic] => {
                let descriptor = registry
                    .descriptors()
                    .find(|descriptor| descriptor.name == topic.as_str())
                    .ok_or_else(|| HedgeError::UnknownCommand {
                        name: topic.clone(),
                    })?;
                let synopsis = format!(
                    "  {} {} {}",
                    ctx.program, descriptor.name, descriptor.usage
                );
                ctx.line("Usage:")?;
                ctx.line(synopsis.trim_end())?;
                ctx.line("")?;
                ctx.line(descriptor.description)
            }
            _ => Err(usage_error(ctx, self)),
        }
    }
}
