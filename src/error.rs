//! Error types for schema discovery and data collection.
//!
//! All fallible operations in this crate return [`CallflowResult<T>`].  Errors
//! are classified into two axes for caller convenience:
//!
//! - **Connection errors** ([`CallflowError::is_connection_error`]): the data
//!   source cannot be reached at all and the run should stop.
//! - **Recoverable errors** ([`CallflowError::is_recoverable`]): one query
//!   failed but the source is still usable; the affected component degrades
//!   to empty and the rest of the report carries on.

use thiserror::Error;

/// Result type alias for call-flow operations
pub type CallflowResult<T> = Result<T, CallflowError>;

/// Comprehensive error types for call-flow discovery
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CallflowError {
    /// IO error from spawning or talking to the database client
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The `mysql` client binary could not be found
    #[error("Database client not found: {program}")]
    ClientNotFound { program: String },

    /// Server unreachable, access denied or unknown database
    #[error("Connection failed: {reason}")]
    ConnectionFailed { reason: String },

    /// The server rejected a query
    #[error("Query failed: {reason} (query: {query})")]
    QueryFailed { query: String, reason: String },

    /// Timeout waiting for a query to finish
    #[error("Query timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Client output did not have the expected shape
    #[error("Malformed client output on line {line}: expected {expected} fields, found {found}")]
    MalformedOutput {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// Table is not present in the source
    #[error("Unknown table: {table}")]
    UnknownTable { table: String },

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Snapshot file could not be used
    #[error("Invalid snapshot: {message}")]
    InvalidSnapshot { message: String },

    /// Generic error with custom message
    #[error("Call-flow error: {message}")]
    Generic { message: String },
}

impl CallflowError {
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    pub fn connection_failed(reason: impl Into<String>) -> Self {
        Self::ConnectionFailed {
            reason: reason.into(),
        }
    }

    pub fn query_failed(query: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::QueryFailed {
            query: query.into(),
            reason: reason.into(),
        }
    }

    /// `true` if the source is still usable and only this query was lost.
    ///
    /// Recoverable: `QueryFailed`, `Timeout`, `MalformedOutput`, `UnknownTable`.
    pub fn is_recoverable(&self) -> bool {
        match self {
            CallflowError::Io(_) => false,
            CallflowError::ClientNotFound { .. } => false,
            CallflowError::ConnectionFailed { .. } => false,
            CallflowError::QueryFailed { .. } => true,
            CallflowError::Timeout { .. } => true,
            CallflowError::MalformedOutput { .. } => true,
            CallflowError::UnknownTable { .. } => true,
            _ => false,
        }
    }

    /// `true` if the data source cannot be reached and the run should stop.
    ///
    /// Matches: `Io`, `ClientNotFound`, `ConnectionFailed`.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            CallflowError::Io(_)
                | CallflowError::ClientNotFound { .. }
                | CallflowError::ConnectionFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_recoverable_not_fatal() {
        let err = CallflowError::Timeout { timeout_ms: 500 };
        assert!(err.is_recoverable());
        assert!(!err.is_connection_error());
    }

    #[test]
    fn connection_failure_is_fatal() {
        let err = CallflowError::connection_failed("Access denied for user 'root'");
        assert!(err.is_connection_error());
        assert!(!err.is_recoverable());
        assert_eq!(
            err.to_string(),
            "Connection failed: Access denied for user 'root'"
        );
    }
}
