//! In-memory driver serving canned catalog results.
//!
//! Responses are keyed by exact statement text and bound arguments. A
//! statement with no canned response returns no rows. The driver records
//! every connect and statement so callers can assert on what was executed.

use super::{Connection, Driver, DriverError, DriverResult, Row};
use crate::dsn::ConnectionParameters;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

type Key = (String, Vec<String>);

#[derive(Default)]
struct Shared {
    connect_error: Option<DriverError>,
    connect_delay: Option<Duration>,
    responses: HashMap<Key, DriverResult<Vec<Row>>>,
    connects: AtomicUsize,
    open: AtomicUsize,
    executed: Mutex<Vec<Key>>,
}

/// Driver backed by a fixed table of responses.
///
/// Clones share the same responses and counters.
///
/// # Example
/// ```rust,ignore
/// use hedgedb_core::connector::{Row, memory::StaticDriver};
///
/// let driver = StaticDriver::new()
///     .respond("SELECT A FROM T WHERE X = ?", &["1"], vec![Row::from_texts(["a"])]);
/// assert_eq!(driver.connect_count(), 0);
/// ```
#[derive(Clone, Default)]
pub struct StaticDriver {
    shared: Arc<Shared>,
}

impl StaticDriver {
    pub fn new() -> Self {
        Self::default()
    }

    fn configure(mut self, f: impl FnOnce(&mut Shared)) -> Self {
        // Configuration happens before the driver is shared.
        if let Some(shared) = Arc::get_mut(&mut self.shared) {
            f(shared);
        } else {
            let mut shared = Shared {
                connect_error: self.shared.connect_error.clone(),
                connect_delay: self.shared.connect_delay,
                responses: self.shared.responses.clone(),
                ..Shared::default()
            };
            f(&mut shared);
            self.shared = Arc::new(shared);
        }
        self
    }

    /// Makes every connect attempt fail with this error.
    pub fn refuse(self, code: u32, message: impl Into<String>) -> Self {
        let error = DriverError::new(code, message);
        self.configure(|shared| shared.connect_error = Some(error))
    }

    /// Makes every connect attempt wait before completing.
    pub fn delay_connect(self, delay: Duration) -> Self {
        self.configure(|shared| shared.connect_delay = Some(delay))
    }

    /// Serves `rows` for `sql` bound to `args`.
    pub fn respond(self, sql: impl Into<String>, args: &[&str], rows: Vec<Row>) -> Self {
        let key = key(sql, args);
        self.configure(|shared| {
            shared.responses.insert(key, Ok(rows));
        })
    }

    /// Fails `sql` bound to `args` with this error.
    pub fn fail(
        self,
        sql: impl Into<String>,
        args: &[&str],
        code: u32,
        message: impl Into<String>,
    ) -> Self {
        let key = key(sql, args);
        let error = DriverError::new(code, message);
        self.configure(|shared| {
            shared.responses.insert(key, Err(error));
        })
    }

    /// Number of connect attempts so far.
    pub fn connect_count(&self) -> usize {
        self.shared.connects.load(Ordering::SeqCst)
    }

    /// Number of sessions opened and not yet closed.
    pub fn open_sessions(&self) -> usize {
        self.shared.open.load(Ordering::SeqCst)
    }

    /// Every statement executed so far, with its bound arguments.
    pub fn executed(&self) -> Vec<(String, Vec<String>)> {
        self.shared
            .executed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

fn key(sql: impl Into<String>, args: &[&str]) -> Key {
    (sql.into(), args.iter().map(|arg| (*arg).to_string()).collect())
}

#[async_trait]
impl Driver for StaticDriver {
    async fn connect(&self, _params: &ConnectionParameters) -> DriverResult<Box<dyn Connection>> {
        self.shared.connects.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.shared.connect_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = &self.shared.connect_error {
            return Err(error.clone());
        }

        self.shared.open.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(StaticConnection {
            shared: Arc::clone(&self.shared),
        }))
    }
}

struct StaticConnection {
    shared: Arc<Shared>,
}

#[async_trait]
impl Connection for StaticConnection {
    async fn execute_query(&mut self, sql: &str, args: &[&str]) -> DriverResult<Vec<Row>> {
        let key = key(sql, args);
        let response = self.shared.responses.get(&key).cloned();
        self.shared
            .executed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(key);

        response.unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn close(self: Box<Self>) -> DriverResult<()> {
        self.shared.open.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}
