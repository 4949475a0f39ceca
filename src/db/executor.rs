//! Query execution seam.
//!
//! Tool handlers only ever see this trait, never the underlying HTTP session.
//! The production implementation is [`ClickHouseConnector`](super::ClickHouseConnector);
//! tests substitute recording stubs.

use crate::error::DbResult;
use crate::models::QueryResult;
use async_trait::async_trait;

/// Capability to run SQL text against the analytics engine.
///
/// Implementations are shared across concurrent tool calls and must not
/// rely on call ordering.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Execute a query and return its structured (`JSON` format) result.
    ///
    /// Errors are returned as-is; callers decide how to present them.
    async fn execute(&self, sql: &str) -> DbResult<QueryResult>;

    /// Lightweight round trip confirming the engine is reachable.
    async fn ping(&self) -> DbResult<()>;
}
