//! `analyze <dsn>`: lists the schema's tables and their engines.

use super::{Command, CommandRegistry, Context, OutputFormat, dsn_argument};
use async_trait::async_trait;
use hedgedb_core::{AnalyzeOptions, Result, Table, analyze};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyzeCommand;

/// JSON document emitted by `analyze` and `describe`.
#[derive(Serialize)]
pub(crate) struct SchemaListing<'a> {
    pub(crate) schema: &'a str,
    pub(crate) tables: &'a [Table],
}

/// Header line naming the analyzed schema.
pub(crate) fn schema_header(schema: &str) -> String {
    format!("Schema: {}", schema)
}

#[async_trait]
impl Command for AnalyzeCommand {
    fn name(&self) -> &'static str {
        "analyze"
    }

    fn description(&self) -> &'static str {
        "List tables and storage engines"
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
        let tables = analyze(ctx.connector, &params, AnalyzeOptions::default()).await?;

        match ctx.settings.format {
            OutputFormat::Json => ctx.json(&SchemaListing {
                schema,
                tables: &tables,
            }),
            OutputFormat::Text => {
                ctx.line(schema_header(schema))?;
                for table in &tables {
                    ctx.line(table)?;
                }
                Ok(())
            }
        }
    }
}
