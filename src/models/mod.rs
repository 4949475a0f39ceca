//! Data models for the ClickHouse MCP Server.
//!
//! This module re-exports all model types used throughout the application.

pub mod connection;
pub mod envelope;
pub mod query;

// Re-export commonly used types
pub use connection::{
    ClickHouseConfig, ClickHouseConfigBuilder, DEFAULT_PLAIN_PORT, DEFAULT_SECURE_PORT,
};
pub use envelope::{EnvelopeContent, ResultEnvelope};
pub use query::{ColumnMeta, QueryResult, QueryStatistics, Row};
