//! `inspect <dsn> [report]`: runs the aggregate catalog reports.

use super::{Command, CommandRegistry, Context, OutputFormat, dsn_argument};
use async_trait::async_trait;
use hedgedb_core::{Report, Result, inspect};

#[derive(Debug, Clone, Copy, Default)]
pub struct InspectCommand;

#[async_trait]
impl Command for InspectCommand {
    fn name(&self) -> &'static str {
        "inspect"
    }

    fn description(&self) -> &'static str {
        "Report engines, charsets, collations, and sizes"
    }

    fn usage(&self) -> &'static str {
        "<dsn> [engines|charsets|collations|sizes]"
    }

    async fn run(
        &self,
        _registry: &CommandRegistry,
        ctx: &mut Context<'_>,
        args: &[String],
    ) -> Result<()> {
        let params = dsn_argument(ctx, self, args, 1)?;
        let reports = match args.get(1) {
            Some(name) => vec![name.parse::<Report>()?],
            None => Report::ALL.to_vec(),
        };

        let results = inspect(ctx.connector, &params, &reports).await?;

        if ctx.settings.format == OutputFormat::Json {
            return ctx.json(&results);
        }

        for result in &results {
            ctx.line(format!("[{}]", result.report))?;
            ctx.line(result.report.headings().join(" "))?;
            for row in &result.rows {
                let cells: Vec<&str> = row
                    .cells()
                    .iter()
                    .map(|cell| cell.as_deref().unwrap_or("NULL"))
                    .collect();
                ctx.line(cells.join(" "))?;
            }
        }
        Ok(())
    }
}
