//! `describe <dsn>`: lists tables together with their columns.

use super::analyze::{SchemaListing, schema_header};
use super::{Command, CommandRegistry, Context, OutputFormat, dsn_argument};
use async_trait::async_trait;
use hedgedb_core::{AnalyzeOptions, Result, analyze};

#[derive(Debug, Clone, Copy, Default)]
pub struct DescribeCommand;

#[async_trait]
impl Command for DescribeCommand {
    fn name(&self) -> &'static str {
        "describe"
    }

    fn description(&self) -> &'static str {
        "List tables with their columns"
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
        let schema = params.require_database()?;
        let tables = analyze(ctx.connector, &params, AnalyzeOptions::with_columns()).await?;

        if ctx.settings.format == OutputFormat::Json {
            return ctx.json(&SchemaListing {
                schema,
                tables: &tables,
            });
        }

        ctx.line(schema_header(schema))?;
        for table in &tables {
            ctx.line(table)?;
            if let Some(error) = &table.column_error {
                ctx.line(format!("  ! {}", error))?;
            }
            for column in &table.columns {
                ctx.line(format!("  {}", column))?;
            }
        }
        Ok(())
    }
}
