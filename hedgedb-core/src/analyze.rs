//! Schema analysis over one session.
//!
//! Each entry point opens its own session, runs its catalog queries, and
//! closes the session before returning, whether or not the queries succeeded.
//! Nothing is cached between calls.

use crate::connector::{ConnectionSession, Connector, Row};
use crate::dsn::ConnectionParameters;
use crate::models::{Column, ColumnError, Table};
use crate::query::{Report, columns_query, tables_query};
use crate::{Result, error::HedgeError};
use serde::Serialize;

/// Options controlling how much detail [`analyze`] collects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyzeOptions {
    /// Also list each table's columns
    pub include_columns: bool,
}

impl AnalyzeOptions {
    pub fn with_columns() -> Self {
        Self {
            include_columns: true,
        }
    }
}

/// Rows produced by one inspection report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportResult {
    pub report: Report,
    pub rows: Vec<Row>,
}

/// Opens and closes a session to confirm the server accepts the parameters.
///
/// # Errors
/// Returns [`HedgeError::ConnectionFailed`] with the driver's code and message.
pub async fn check_connection(connector: &Connector, params: &ConnectionParameters) -> Result<()> {
    let session = connector.connect(params).await.established()?;
    session.disconnect().await;
    Ok(())
}

/// Lists the tables of the schema named in `params`, in catalog order.
///
/// With [`AnalyzeOptions::include_columns`], each table's columns are listed
/// in ordinal order. A rejected column query or an unreadable column row is
/// recorded on that table in [`Table::column_error`] and analysis continues
/// with the next table.
///
/// # Errors
/// - [`HedgeError::MalformedDsn`] if no database was named
/// - [`HedgeError::ConnectionFailed`] if the session could not be opened
/// - [`HedgeError::QueryFailed`] if the table listing failed
pub async fn analyze(
    connector: &Connector,
    params: &ConnectionParameters,
    options: AnalyzeOptions,
) -> Result<Vec<Table>> {
    let schema = params.require_database()?;
    let mut session = connector.connect(params).await.established()?;

    let start_time = std::time::Instant::now();
    let result = collect_tables(&mut session, schema, options).await;
    session.disconnect().await;

    if let Ok(tables) = &result {
        tracing::info!(
            "Analyzed {} tables in schema '{}' in {:.2}s",
            tables.len(),
            schema,
            start_time.elapsed().as_secs_f64()
        );
    }
    result
}

async fn collect_tables(
    session: &mut ConnectionSession,
    schema: &str,
    options: AnalyzeOptions,
) -> Result<Vec<Table>> {
    let rows = session.query(&tables_query().to_sql(), &[schema]).await?;
    let mut tables = rows.iter().map(Table::from_row).collect::<Result<Vec<_>>>()?;

    if !options.include_columns {
        return Ok(tables);
    }

    let columns_sql = columns_query().to_sql();
    for table in &mut tables {
        let listed = session
            .query(&columns_sql, &[schema, table.name.as_str()])
            .await
            .and_then(|rows| rows.iter().map(Column::from_row).collect::<Result<Vec<_>>>());
        match listed {
            Ok(columns) => {
                tracing::debug!(
                    "Collected {} columns for table '{}'",
                    columns.len(),
                    table.name
                );
                table.columns = columns;
            }
            Err(e) => {
                let error = ColumnError::from_error(e)?;
                tracing::warn!("Failed to list columns for table '{}': {}", table.name, error);
                table.column_error = Some(error);
            }
        }
    }

    Ok(tables)
}

/// Runs the given aggregate reports against the schema named in `params`.
///
/// # Errors
/// - [`HedgeError::MalformedDsn`] if no database was named
/// - [`HedgeError::ConnectionFailed`] if the session could not be opened
/// - [`HedgeError::QueryFailed`] if any report query failed
pub async fn inspect(
    connector: &Connector,
    params: &ConnectionParameters,
    reports: &[Report],
) -> Result<Vec<ReportResult>> {
    let schema = params.require_database()?;
    let mut session = connector.connect(params).await.established()?;

    let mut results = Vec::with_capacity(reports.len());
    let mut failure = None;
    for &report in reports {
        match session.query(report.sql(), &[schema]).await {
            Ok(rows) => results.push(ReportResult { report, rows }),
            Err(e) => {
                failure = Some(e);
                break;
            }
        }
    }
    session.disconnect().await;

    match failure {
        Some(e) => Err(e),
        None => Ok(results),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::DriverError;
    use crate::connector::memory::StaticDriver;
    use crate::dsn::parse;

    const TABLES_SQL: &str =
        "SELECT TABLE_NAME,ENGINE FROM information_schema.TABLES WHERE TABLE_SCHEMA = ?";

    fn shop() -> ConnectionParameters {
        parse("root:pw@localhost/shop").unwrap()
    }

    fn shop_driver() -> StaticDriver {
        StaticDriver::new().respond(
            TABLES_SQL,
            &["shop"],
            vec![
                Row::from_texts(["users", "InnoDB"]),
                Row::from_texts(["logs", "InnoDB"]),
            ],
        )
    }

    #[tokio::test]
    async fn test_analyze_keeps_catalog_order() {
        let driver = shop_driver();
        let connector = Connector::new(driver.clone());

        let tables = analyze(&connector, &shop(), AnalyzeOptions::default())
            .await
            .unwrap();

        let names: Vec<_> = tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["users", "logs"]);
        assert_eq!(driver.executed().len(), 1);
        assert_eq!(driver.open_sessions(), 0);
    }

    #[tokio::test]
    async fn test_analyze_requires_database() {
        let driver = shop_driver();
        let connector = Connector::new(driver.clone());
        let params = crate::dsn::parse_lenient("root:pw@localhost");

        let err = analyze(&connector, &params, AnalyzeOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, HedgeError::MalformedDsn { .. }));
        assert_eq!(driver.connect_count(), 0);
    }

    #[tokio::test]
    async fn test_table_listing_failure_fails_analysis() {
        let driver = StaticDriver::new().fail(TABLES_SQL, &["shop"], 1142, "SELECT command denied");
        let connector = Connector::new(driver.clone());

        let err = analyze(&connector, &shop(), AnalyzeOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, HedgeError::QueryFailed { code: 1142, .. }));
        assert_eq!(driver.open_sessions(), 0);
    }

    #[tokio::test]
    async fn test_column_failure_is_recorded_per_table() {
        let columns_sql = columns_query().to_sql();
        let driver = shop_driver()
            .respond(
                columns_sql.clone(),
                &["shop", "users"],
                vec![Row::from_texts(["id", "1", "0", "NO", "int"])],
            )
            .fail(columns_sql, &["shop", "logs"], 1142, "denied");
        let connector = Connector::new(driver);

        let tables = analyze(&connector, &shop(), AnalyzeOptions::with_columns())
            .await
            .unwrap();

        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].columns.len(), 1);
        assert_eq!(tables[0].column_error, None);
        assert!(tables[1].columns.is_empty());
        assert_eq!(
            tables[1].column_error,
            Some(ColumnError::Query(DriverError::new(1142, "denied")))
        );
    }

    #[tokio::test]
    async fn test_malformed_column_row_is_recorded_per_table() {
        let columns_sql = columns_query().to_sql();
        let driver = shop_driver()
            .respond(
                columns_sql.clone(),
                &["shop", "users"],
                vec![Row::from_texts(["id", "1", "0", "NO", "int"])],
            )
            .respond(
                columns_sql,
                &["shop", "logs"],
                vec![Row::new(vec![Some("msg".to_string()), None])],
            );
        let connector = Connector::new(driver.clone());

        let tables = analyze(&connector, &shop(), AnalyzeOptions::with_columns())
            .await
            .unwrap();

        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].name, "users");
        assert_eq!(tables[0].columns.len(), 1);
        assert_eq!(tables[0].column_error, None);
        assert_eq!(tables[1].name, "logs");
        assert!(tables[1].columns.is_empty());
        assert_eq!(
            tables[1].column_error,
            Some(ColumnError::Malformed {
                context: "missing ORDINAL_POSITION".to_string()
            })
        );
        assert_eq!(driver.open_sessions(), 0);
    }

    #[tokio::test]
    async fn test_check_connection_reports_refusal() {
        let connector = Connector::new(StaticDriver::new().refuse(1045, "Access denied"));
        let err = check_connection(&connector, &shop()).await.unwrap_err();
        assert!(matches!(err, HedgeError::ConnectionFailed { code: 1045, .. }));
    }

    #[tokio::test]
    async fn test_inspect_runs_reports_in_order() {
        let driver = StaticDriver::new().respond(
            Report::Engines.sql(),
            &["shop"],
            vec![Row::from_texts(["InnoDB", "2"])],
        );
        let connector = Connector::new(driver.clone());

        let results = inspect(&connector, &shop(), &[Report::Engines, Report::Sizes])
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].report, Report::Engines);
        assert_eq!(results[0].rows, vec![Row::from_texts(["InnoDB", "2"])]);
        assert!(results[1].rows.is_empty());
        assert_eq!(driver.open_sessions(), 0);
    }

    #[tokio::test]
    async fn test_inspect_failure_closes_session() {
        let driver = StaticDriver::new().fail(Report::Charsets.sql(), &["shop"], 1142, "denied");
        let connector = Connector::new(driver.clone());

        let err = inspect(&connector, &shop(), &Report::ALL).await.unwrap_err();
        assert!(matches!(err, HedgeError::QueryFailed { .. }));
        assert_eq!(driver.open_sessions(), 0);
        assert_eq!(driver.executed().len(), 2);
    }
}
