//! Core library for HedgeDB.
//!
//! This crate provides connection-descriptor parsing, catalog statement
//! construction, the schema model, and session management shared by the
//! `hedgedb` command-line tool.
//!
//! # Guarantees
//! - All catalog access is read-only
//! - Schema and table names are bound as parameters, never spliced into SQL
//! - Passwords never appear in logs, errors, or serialized output
//!
//! # Architecture
//! - [`dsn`] parses `user:password@host[:port]/database`
//! - [`query`] builds `information_schema` statements and report templates
//! - [`connector`] owns one session over a pluggable [`Driver`]
//! - [`models`] holds the [`Table`] and [`Column`] entities
//! - [`analyze`] ties the above together for one operation per session

pub mod analyze;
pub mod connector;
pub mod dsn;
pub mod error;
pub mod logging;
pub mod models;
pub mod query;

// Re-export commonly used types
pub use analyze::{AnalyzeOptions, ReportResult, analyze, check_connection, inspect};
pub use connector::{Connection, ConnectionSession, Connector, Driver, DriverError, Row};
pub use dsn::{ConnectionParameters, DEFAULT_PORT};
pub use error::{HedgeError, Result};
pub use logging::init_logging;
pub use models::{Column, ColumnError, Table};
pub use query::{QuerySpec, Report, build_select};

#[cfg(feature = "mysql")]
pub use connector::mysql::MySqlDriver;
