//! Database abstraction layer.
//!
//! This module provides database access functionality:
//! - The `QueryExecutor` seam used by every tool handler
//! - The ClickHouse HTTP connector that implements it

pub mod connector;
pub mod executor;

pub use connector::ClickHouseConnector;
pub use executor::QueryExecutor;
