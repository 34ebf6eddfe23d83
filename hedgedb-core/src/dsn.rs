//! Connection descriptor parsing.
//!
//! A descriptor has the form `user:password@host[:port]/database`. Two
//! parsers are provided:
//! - [`parse`] validates the descriptor and fails with
//!   [`HedgeError::MalformedDsn`] when a delimiter or field is missing.
//! - [`parse_lenient`] reads fields positionally and never fails; missing
//!   pieces come back empty or absent.
//!
//! Both agree on field boundaries for well-formed input: the user ends at the
//! first `:`, the password at the following `@`, the host at the next `:` or
//! `/`, and the port at the following `/`.
//!
//! # Security
//! - The password is kept in a [`Zeroizing`] container
//! - `Debug` and `Display` never print the password

use crate::{Result, error::HedgeError};
use regex::Regex;
use std::sync::OnceLock;
use zeroize::Zeroizing;

/// Port used when the descriptor does not name one.
pub const DEFAULT_PORT: u16 = 3306;

/// Structured connection parameters parsed from a descriptor.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionParameters {
    user: String,
    password: Zeroizing<String>,
    host: String,
    port: Option<u16>,
    database: Option<String>,
}

impl ConnectionParameters {
    /// Creates connection parameters from already separated fields.
    pub fn new(
        user: impl Into<String>,
        password: impl Into<String>,
        host: impl Into<String>,
        port: Option<u16>,
        database: Option<String>,
    ) -> Self {
        Self {
            user: user.into(),
            password: Zeroizing::new(password.into()),
            host: host.into(),
            port,
            database,
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// The password, for handing to a driver. Never log this.
    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// The port named in the descriptor, if any.
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// The named port, or [`DEFAULT_PORT`].
    pub fn port_or_default(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    /// The database name, required by catalog operations.
    ///
    /// # Errors
    /// Returns [`HedgeError::MalformedDsn`] if the descriptor named no database.
    pub fn require_database(&self) -> Result<&str> {
        self.database()
            .ok_or_else(|| HedgeError::malformed_dsn("a database name is required"))
    }
}

impl std::fmt::Debug for ConnectionParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionParameters")
            .field("user", &self.user)
            .field("password", &"****")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .finish()
    }
}

impl std::fmt::Display for ConnectionParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}@{}:{}/{}",
            self.user,
            self.host,
            self.port_or_default(),
            self.database.as_deref().unwrap_or("")
        )
        // Password intentionally omitted
    }
}

fn dsn_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(?P<user>[^:@/]+):(?P<password>[^@/]*)@(?P<host>[^:@/]+)(?::(?P<port>[^/]*))?/(?P<database>.+)$",
        )
        .expect("Invalid DSN pattern")
    })
}

/// Parses a descriptor, rejecting anything that is not well formed.
///
/// The port may be omitted; see [`ConnectionParameters::port_or_default`].
///
/// # Errors
/// Returns [`HedgeError::MalformedDsn`] naming the first problem found.
///
/// # Example
/// ```rust
/// use hedgedb_core::dsn::parse;
///
/// let params = parse("app:secret@db.internal:3307/shop").unwrap();
/// assert_eq!(params.user(), "app");
/// assert_eq!(params.port(), Some(3307));
/// assert_eq!(params.database(), Some("shop"));
/// ```
pub fn parse(descriptor: &str) -> Result<ConnectionParameters> {
    let Some(caps) = dsn_pattern().captures(descriptor) else {
        return Err(HedgeError::malformed_dsn(diagnose(descriptor)));
    };

    let port = match caps.name("port") {
        None => None,
        Some(port) => Some(port.as_str().parse::<u16>().map_err(|_| {
            HedgeError::malformed_dsn(format!("invalid port '{}'", port.as_str()))
        })?),
    };
    if port == Some(0) {
        return Err(HedgeError::malformed_dsn("port must be greater than 0"));
    }

    Ok(ConnectionParameters::new(
        &caps["user"],
        &caps["password"],
        &caps["host"],
        port,
        Some(caps["database"].to_string()),
    ))
}

/// Explains why a descriptor did not match the expected shape.
fn diagnose(descriptor: &str) -> String {
    let Some(at) = descriptor.find('@') else {
        return "missing '@' between credentials and host".to_string();
    };
    let (credentials, location) = (&descriptor[..at], &descriptor[at + 1..]);

    if !credentials.contains(':') {
        return "missing ':' between user and password".to_string();
    }
    if credentials.starts_with(':') {
        return "missing user".to_string();
    }
    let Some(slash) = location.find('/') else {
        return "missing '/' before database name".to_string();
    };
    if slash == 0 || location.starts_with(':') {
        return "missing host".to_string();
    }
    if slash + 1 == location.len() {
        return "missing database name".to_string();
    }
    "expected user:password@host[:port]/database".to_string()
}

/// Parses a descriptor positionally without validation.
///
/// Missing delimiters leave the corresponding fields empty or absent; an
/// unparseable port is dropped. Use [`parse`] for user-supplied input.
pub fn parse_lenient(descriptor: &str) -> ConnectionParameters {
    let (credentials, location) = match descriptor.split_once('@') {
        Some((credentials, location)) => (credentials, location),
        None => ("", descriptor),
    };
    let (user, password) = credentials.split_once(':').unwrap_or((credentials, ""));
    let (host_port, database) = match location.split_once('/') {
        Some((host_port, database)) => (host_port, Some(database)),
        None => (location, None),
    };
    let (host, port) = match host_port.split_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (host_port, None),
    };

    let port = port.and_then(|p| match p.parse::<u16>() {
        Ok(port) => Some(port),
        Err(_) => {
            tracing::warn!("Ignoring unparseable port in connection descriptor");
            None
        }
    });

    ConnectionParameters::new(
        user,
        password,
        host,
        port,
        database.filter(|db| !db.is_empty()).map(str::to_string),
    )
}
