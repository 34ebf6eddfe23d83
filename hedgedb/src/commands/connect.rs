//! `connect <dsn>`: checks that the server accepts the credentials.

use super::{Command, CommandRegistry, Context, dsn_argument};
use async_trait::async_trait;
use hedgedb_core::{Result, check_connection};

#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectCommand;

#[async_trait]
impl Command for ConnectCommand {
    fn name(&self) -> &'static str {
        "connect"
    }

    fn description(&self) -> &'static str {
        "Test database connectivity"
    }

    fn usage(&self) -> &'static str {
        "<dsn>"
    }

    async fn run(
        &self,
        _registry: &CommandRegistry,
        ctx: &mut Context<'_>,
        args: &[String],
    ) -> Result<()> {
        let params = dsn_argument(ctx, self, args, 0)?;

        // A refusal surfaces from dispatch as `FAIL <code> <message>`.
        check_connection(ctx.connector, &params).await?;
        ctx.line("PASS")
    }
}
