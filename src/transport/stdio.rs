//! Stdio transport for the MCP server.
//!
//! This transport uses standard input/output for communication,
//! which is the standard mode for CLI-based MCP integrations.

use crate::error::{DbError, DbResult};
use crate::mcp::ClickHouseService;
use crate::transport::{Transport, wait_for_signal};
use rmcp::{ServiceExt, transport::stdio};
use tracing::{info, warn};

/// Stdio transport implementation.
///
/// This transport reads JSON-RPC messages from stdin and writes
/// responses to stdout, following the MCP protocol specification.
pub struct StdioTransport {
    service: ClickHouseService,
}

impl StdioTransport {
    /// Create a new stdio transport serving the given service.
    pub fn new(service: ClickHouseService) -> Self {
        Self { service }
    }
}

impl Transport for StdioTransport {
    async fn run(&self) -> DbResult<()> {
        info!(transport = self.name(), "Starting MCP server");

        let running_service = self
            .service
            .clone()
            .serve(stdio())
            .await
            .map_err(|e| DbError::internal(format!("Failed to start stdio transport: {}", e)))?;

        info!("ClickHouse MCP server started");

        let shutdown_requested = tokio::select! {
            result = running_service.waiting() => {
                match result {
                    Ok(_quit_reason) => {
                        info!("Stdio transport completed normally");
                    }
                    Err(e) => {
                        warn!(error = %e, "Stdio transport error");
                        return Err(DbError::internal(format!(
                            "Stdio transport error: {}",
                            e
                        )));
                    }
                }
                false
            }
            _ = wait_for_signal() => {
                info!("Shutdown signal received");
                true
            }
        };

        if shutdown_requested {
            // tokio::select! cannot interrupt the blocking stdin read
            info!("Exiting process");
            std::process::exit(0);
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "stdio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::QueryExecutor;
    use crate::models::QueryResult;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct EmptyExecutor;

    #[async_trait]
    impl QueryExecutor for EmptyExecutor {
        async fn execute(&self, _sql: &str) -> DbResult<QueryResult> {
            Ok(QueryResult::default())
        }

        async fn ping(&self) -> DbResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_stdio_transport_creation() {
        let service = ClickHouseService::new(Arc::new(EmptyExecutor), None);
        let transport = StdioTransport::new(service);
        assert_eq!(transport.name(), "stdio");
    }
}
