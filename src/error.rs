//! Error types for nl-dash.

use thiserror::Error;

/// Main error type for nl-dash operations.
#[derive(Error, Debug)]
pub enum DashError {
    /// Configuration errors (invalid config file, missing required fields).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database connection errors (host unreachable, auth failed).
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution errors (syntax errors, unknown tables).
    #[error("Query error: {0}")]
    Query(String),

    /// Saved-query store errors.
    #[error("Store error: {0}")]
    Store(String),

    /// Internal application errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DashError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a store error with the given message.
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Result type alias using DashError.
pub type Result<T> = std::result::Result<T, DashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DashError::connection("Cannot connect to localhost:3306");
        assert_eq!(
            err.to_string(),
            "Connection error: Cannot connect to localhost:3306"
        );

        let err = DashError::query("Unknown column 'emal' in 'field list'");
        assert_eq!(
            err.to_string(),
            "Query error: Unknown column 'emal' in 'field list'"
        );
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DashError>();
    }
}
