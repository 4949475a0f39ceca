//! Query execution tool.
//!
//! This module implements the `run_select_query` MCP tool. Statements that do not
//! start with SELECT, SHOW or DESCRIBE are rejected before reaching ClickHouse.

use crate::db::QueryExecutor;
use crate::error::DbResult;
use crate::models::ResultEnvelope;
use crate::tools::{format, guard};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Input for the run_select_query tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RunSelectQueryInput {
    /// The SELECT query to execute. Only SELECT, SHOW and DESCRIBE statements are allowed.
    pub query: String,
}

/// Handler for query execution.
pub struct QueryToolHandler {
    executor: Arc<dyn QueryExecutor>,
}

impl QueryToolHandler {
    /// Create a new query tool handler.
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        Self { executor }
    }

    /// Handle the run_select_query tool call.
    ///
    /// Rejected statements never reach the executor.
    pub async fn run_select_query(&self, input: RunSelectQueryInput) -> ResultEnvelope {
        let query = input.query.trim();

        if let Err(e) = guard::enforce(query) {
            warn!(statement = %query, "Query rejected by policy guard");
            return format::error(format!("Error: {}", e));
        }

        format::from_result("executing query", self.execute(query).await)
    }

    async fn execute(&self, query: &str) -> DbResult<String> {
        let start = Instant::now();
        let result = self.executor.execute(query).await?;

        info!(
            row_count = result.row_count(),
            execution_time_ms = start.elapsed().as_millis() as u64,
            "Query executed"
        );

        format::pretty_json(&result)
    }
}
