//! Error types for HedgeDB operations.
//!
//! Every failure in the core is a value of [`HedgeError`]. Commands surface
//! them as a single diagnostic line; nothing here carries a password.

use thiserror::Error;

/// Main error type for HedgeDB operations.
#[derive(Debug, Error)]
pub enum HedgeError {
    /// Connection descriptor is missing a delimiter or field
    #[error("Malformed DSN: {reason}")]
    MalformedDsn { reason: String },

    /// Driver refused or failed to open a session
    #[error("FAIL {code} {message}")]
    ConnectionFailed { code: u32, message: String },

    /// Driver failed while running a catalog query
    #[error("Query failed: {code} {message}")]
    QueryFailed { code: u32, message: String },

    /// Catalog returned a row the schema model cannot use
    #[error("Unexpected catalog row: {context}")]
    MalformedRow { context: String },

    /// No command registered under this name
    #[error("Unknown command: {name}")]
    UnknownCommand { name: String },

    /// No inspection report registered under this name
    #[error("Unknown report: {name}")]
    UnknownReport { name: String },

    /// Two commands were registered under the same name
    #[error("Duplicate command: {name}")]
    DuplicateCommand { name: String },

    /// Command invoked without its required arguments
    #[error("Usage: {usage}")]
    Usage { usage: String },

    /// Session failed to connect or was already closed
    #[error("Session is not open")]
    SessionUnavailable,

    /// Configuration or setup error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// I/O operation failed
    #[error("I/O operation failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization failed
    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results with HedgeError
pub type Result<T> = std::result::Result<T, HedgeError>;

impl HedgeError {
    /// Creates a malformed DSN error
    pub fn malformed_dsn(reason: impl Into<String>) -> Self {
        Self::MalformedDsn {
            reason: reason.into(),
        }
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a usage error carrying the command's usage line
    pub fn usage(usage: impl Into<String>) -> Self {
        Self::Usage {
            usage: usage.into(),
        }
    }

    /// Wraps an I/O error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Wraps a serialization error with context
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_failed_display() {
        let error = HedgeError::ConnectionFailed {
            code: 1045,
            message: "Access denied".to_string(),
        };
        assert_eq!(error.to_string(), "FAIL 1045 Access denied");
    }

    #[test]
    fn test_error_creation() {
        let error = HedgeError::malformed_dsn("missing '@'");
        assert!(error.to_string().contains("missing '@'"));

        let error = HedgeError::usage("hedgedb connect <dsn>");
        assert_eq!(error.to_string(), "Usage: hedgedb connect <dsn>");

        let error = HedgeError::UnknownCommand {
            name: "bogus".to_string(),
        };
        assert_eq!(error.to_string(), "Unknown command: bogus");
    }
}
