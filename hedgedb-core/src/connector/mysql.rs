//! MySQL driver backed by a single sqlx connection.
//!
//! # Security Features
//! - Statement logging is disabled so bound values never reach the logs
//! - Sessions are switched to read-only transactions on connect
//! - Error messages come from the server and never echo the password

use super::{Connection, Driver, DriverError, DriverResult, Row};
use crate::dsn::ConnectionParameters;
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlDatabaseError, MySqlRow};
use sqlx::{ConnectOptions, Connection as _, Row as _};

/// Client error: unknown failure.
const CR_UNKNOWN_ERROR: u32 = 2000;
/// Client error: cannot reach the server.
const CR_CONN_HOST_ERROR: u32 = 2003;
/// Client error: TLS negotiation failed.
const CR_SSL_CONNECTION_ERROR: u32 = 2026;

/// Opens MySQL connections from [`ConnectionParameters`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDriver;

impl MySqlDriver {
    pub fn new() -> Self {
        Self
    }
}

/// Builds sqlx connect options, applying the default port when none is given.
pub fn connect_options(params: &ConnectionParameters) -> MySqlConnectOptions {
    let options = MySqlConnectOptions::new()
        .host(params.host())
        .port(params.port_or_default())
        .username(params.user())
        .password(params.password());

    let options = match params.database() {
        Some(database) => options.database(database),
        None => options,
    };

    options.disable_statement_logging()
}

#[async_trait]
impl Driver for MySqlDriver {
    async fn connect(&self, params: &ConnectionParameters) -> DriverResult<Box<dyn Connection>> {
        let mut conn = connect_options(params)
            .connect()
            .await
            .map_err(driver_error)?;

        sqlx::query("SET SESSION TRANSACTION READ ONLY")
            .execute(&mut conn)
            .await
            .map_err(driver_error)?;

        Ok(Box::new(MySqlSession { conn }))
    }
}

struct MySqlSession {
    conn: MySqlConnection,
}

#[async_trait]
impl Connection for MySqlSession {
    async fn execute_query(&mut self, sql: &str, args: &[&str]) -> DriverResult<Vec<Row>> {
        let mut query = sqlx::query(sql);
        for arg in args {
            query = query.bind((*arg).to_string());
        }

        let rows = query
            .fetch_all(&mut self.conn)
            .await
            .map_err(driver_error)?;

        Ok(rows.iter().map(decode_row).collect())
    }

    async fn close(self: Box<Self>) -> DriverResult<()> {
        self.conn.close().await.map_err(driver_error)
    }
}

fn decode_row(row: &MySqlRow) -> Row {
    Row::new((0..row.len()).map(|index| decode_cell(row, index)).collect())
}

/// Renders one cell as text, whatever its column type.
///
/// Catalog views mix text, integer, and (on MySQL 8.0+) VARBINARY columns.
fn decode_cell(row: &MySqlRow, index: usize) -> Option<String> {
    if let Ok(value) = row.try_get::<Option<String>, _>(index) {
        return value;
    }
    if let Ok(value) = row.try_get::<Option<i64>, _>(index) {
        return value.map(|v| v.to_string());
    }
    if let Ok(value) = row.try_get::<Option<u64>, _>(index) {
        return value.map(|v| v.to_string());
    }
    if let Ok(value) = row.try_get::<Option<f64>, _>(index) {
        return value.map(|v| v.to_string());
    }
    if let Ok(value) = row.try_get::<Option<Vec<u8>>, _>(index) {
        return value.map(|bytes| String::from_utf8_lossy(&bytes).into_owned());
    }

    tracing::trace!("Column {} has a type with no text rendering", index);
    None
}

/// Classifies a sqlx error as a `{code, message}` pair.
///
/// Server errors keep the server's error number; client-side failures use
/// the matching MySQL client error number.
fn driver_error(error: sqlx::Error) -> DriverError {
    match &error {
        sqlx::Error::Database(db_error) => {
            let code = db_error
                .try_downcast_ref::<MySqlDatabaseError>()
                .map_or(CR_UNKNOWN_ERROR, |e| u32::from(e.number()));
            DriverError::new(code, db_error.message())
        }
        sqlx::Error::Io(e) => DriverError::new(
            CR_CONN_HOST_ERROR,
            format!("Can't connect to MySQL server: {}", e),
        ),
        sqlx::Error::Tls(e) => DriverError::new(CR_SSL_CONNECTION_ERROR, e.to_string()),
        sqlx::Error::PoolTimedOut => {
            DriverError::new(CR_CONN_HOST_ERROR, "Timed out waiting for a connection")
        }
        other => DriverError::new(CR_UNKNOWN_ERROR, other.to_string()),
    }
}
