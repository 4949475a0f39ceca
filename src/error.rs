//! Error types for the ClickHouse MCP Server.
//!
//! This module defines all error types using `thiserror` for ergonomic error handling.
//! Startup errors (`Config`, `Connection` from the liveness probe) are fatal and handled
//! by the binary. Everything else is caught at the tool handler boundary and rendered
//! into an error envelope for the caller.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Connection failed: {message}")]
    Connection { message: String, suggestion: String },

    #[error("Database error: {message}")]
    Database {
        message: String,
        /// ClickHouse exception code, e.g. "497" for access denied
        code: Option<String>,
    },

    #[error("Only SELECT, SHOW, and DESCRIBE queries are allowed for security reasons.")]
    PolicyRejected { statement: String },

    #[error(
        "No database specified. Pass the 'database' parameter or configure CLICKHOUSE_DATABASE."
    )]
    DatabaseRequired,

    #[error("Timeout: {operation} exceeded {elapsed_secs}s")]
    Timeout {
        operation: String,
        elapsed_secs: u64,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DbError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a connection error with a helpful suggestion.
    pub fn connection(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Create a database error with an optional ClickHouse exception code.
    pub fn database(message: impl Into<String>, code: Option<String>) -> Self {
        Self::Database {
            message: message.into(),
            code,
        }
    }

    /// Create a policy rejection for the given statement text.
    pub fn policy_rejected(statement: impl Into<String>) -> Self {
        Self::PolicyRejected {
            statement: statement.into(),
        }
    }

    /// Create a timeout error.
    pub fn timeout(operation: impl Into<String>, elapsed_secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            elapsed_secs,
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the suggestion for this error, if available.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Connection { suggestion, .. } => Some(suggestion),
            Self::DatabaseRequired => Some("Call list_databases to see available databases"),
            _ => None,
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::Timeout { .. })
    }
}

/// Convert HTTP client errors to DbError.
impl From<reqwest::Error> for DbError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DbError::connection(
                format!("Request timed out: {}", err),
                "Increase CLICKHOUSE_CONNECT_TIMEOUT_SEC or simplify the query",
            )
        } else if err.is_connect() {
            DbError::connection(
                format!("Failed to reach ClickHouse: {}", err),
                "Check CLICKHOUSE_HOST, CLICKHOUSE_PORT and network connectivity",
            )
        } else if err.is_builder() {
            DbError::config(format!("Invalid client configuration: {}", err))
        } else if err.is_decode() {
            DbError::internal(format!("Failed to decode ClickHouse response: {}", err))
        } else {
            DbError::connection(
                format!("HTTP error: {}", err),
                "Check that the server speaks the ClickHouse HTTP interface",
            )
        }
    }
}

/// Result type alias for database operations.
pub type DbResult<T> = Result<T, DbError>;
