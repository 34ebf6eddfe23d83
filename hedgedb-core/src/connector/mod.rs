//! Database session management over a pluggable driver.
//!
//! The driver is an opaque capability: it opens a [`Connection`] and runs
//! parameterized statements on it. [`Connector`] wraps a driver and hands out
//! one [`ConnectionSession`] per call to [`Connector::connect`].
//!
//! # Module Structure
//! - `mysql`: sqlx-backed MySQL driver (feature `mysql`)
//! - `memory`: canned-response driver for tests (feature `test-support`)
//!
//! # Session Invariants
//! - A session either holds a live connection or the error that prevented it
//! - A failed session rejects queries and has nothing to release
//! - [`ConnectionSession::disconnect`] consumes the session, so it runs once

#[cfg(feature = "mysql")]
pub mod mysql;

#[cfg(any(test, feature = "test-support"))]
pub mod memory;

use crate::{Result, dsn::ConnectionParameters, error::HedgeError};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Client error number reported when no session could be opened in time.
pub const CONNECT_TIMEOUT_CODE: u32 = 2003;

/// Default limit on how long opening a session may take.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Result type for driver operations
pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// Failure reported by the driver: a numeric code and its message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{code} {message}")]
pub struct DriverError {
    pub code: u32,
    pub message: String,
}

impl DriverError {
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// One result row: nullable cells rendered as text, in select-list order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Row(Vec<Option<String>>);

impl Row {
    pub fn new(cells: Vec<Option<String>>) -> Self {
        Self(cells)
    }

    /// Builds a row in which every cell is non-null.
    pub fn from_texts<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(cells.into_iter().map(|cell| Some(cell.into())).collect())
    }

    /// The cell at `index`, or `None` if it is NULL or out of range.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).and_then(Option::as_deref)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn cells(&self) -> &[Option<String>] {
        &self.0
    }
}

/// Opens connections. Implementations must not retry.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Opens a live connection using the given parameters.
    async fn connect(&self, params: &ConnectionParameters) -> DriverResult<Box<dyn Connection>>;
}

/// A live connection produced by a [`Driver`].
#[async_trait]
pub trait Connection: Send {
    /// Runs `sql`, binding `args` to its `?` placeholders in order.
    async fn execute_query(&mut self, sql: &str, args: &[&str]) -> DriverResult<Vec<Row>>;

    /// Releases the connection.
    async fn close(self: Box<Self>) -> DriverResult<()>;
}

/// Hands out sessions from a driver, applying the connect timeout.
#[derive(Clone)]
pub struct Connector {
    driver: Arc<dyn Driver>,
    connect_timeout: Duration,
}

impl std::fmt::Debug for Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connector")
            .field("connect_timeout", &self.connect_timeout)
            .finish_non_exhaustive()
    }
}

impl Connector {
    pub fn new(driver: impl Driver + 'static) -> Self {
        Self::from_shared(Arc::new(driver))
    }

    pub fn from_shared(driver: Arc<dyn Driver>) -> Self {
        Self {
            driver,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Builder method to set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Opens a session. Failure is recorded in the returned session.
    pub async fn connect(&self, params: &ConnectionParameters) -> ConnectionSession {
        tracing::info!("Opening session to {}", params);

        match tokio::time::timeout(self.connect_timeout, self.driver.connect(params)).await {
            Ok(Ok(connection)) => {
                tracing::debug!("Session established");
                ConnectionSession {
                    state: SessionState::Open(connection),
                }
            }
            Ok(Err(error)) => {
                tracing::info!("Connection refused: {}", error);
                ConnectionSession::failed(error)
            }
            Err(_) => {
                tracing::info!(
                    "Connection timed out after {:.1}s",
                    self.connect_timeout.as_secs_f64()
                );
                ConnectionSession::failed(DriverError::new(
                    CONNECT_TIMEOUT_CODE,
                    format!(
                        "Connection timed out after {}s",
                        self.connect_timeout.as_secs()
                    ),
                ))
            }
        }
    }
}

enum SessionState {
    Open(Box<dyn Connection>),
    Failed(DriverError),
}

/// A single database session, or the error that prevented opening it.
pub struct ConnectionSession {
    state: SessionState,
}

impl std::fmt::Debug for ConnectionSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.state {
            SessionState::Open(_) => f.write_str("ConnectionSession(open)"),
            SessionState::Failed(error) => write!(f, "ConnectionSession(failed: {})", error),
        }
    }
}

impl ConnectionSession {
    fn failed(error: DriverError) -> Self {
        Self {
            state: SessionState::Failed(error),
        }
    }

    /// The connect error, if the session never opened.
    pub fn error(&self) -> Option<&DriverError> {
        match &self.state {
            SessionState::Open(_) => None,
            SessionState::Failed(error) => Some(error),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, SessionState::Open(_))
    }

    /// Converts a failed session into [`HedgeError::ConnectionFailed`].
    ///
    /// # Errors
    /// Returns the recorded connect error.
    pub fn established(self) -> Result<Self> {
        match self.state {
            SessionState::Open(connection) => Ok(Self {
                state: SessionState::Open(connection),
            }),
            SessionState::Failed(DriverError { code, message }) => {
                Err(HedgeError::ConnectionFailed { code, message })
            }
        }
    }

    /// Runs a parameterized statement on the session.
    ///
    /// # Errors
    /// - [`HedgeError::SessionUnavailable`] if the session never opened
    /// - [`HedgeError::QueryFailed`] if the driver reports a failure
    pub async fn query(&mut self, sql: &str, args: &[&str]) -> Result<Vec<Row>> {
        let SessionState::Open(connection) = &mut self.state else {
            return Err(HedgeError::SessionUnavailable);
        };

        tracing::debug!("Executing: {} ({} bound)", sql, args.len());
        let rows = connection
            .execute_query(sql, args)
            .await
            .map_err(|DriverError { code, message }| HedgeError::QueryFailed { code, message })?;
        tracing::trace!("Fetched {} rows", rows.len());

        Ok(rows)
    }

    /// Closes the session. A failed session has nothing to release.
    pub async fn disconnect(self) {
        if let SessionState::Open(connection) = self.state {
            match connection.close().await {
                Ok(()) => tracing::info!("Session closed"),
                Err(e) => tracing::warn!("Error while closing session: {}", e),
            }
        }
    }
}
