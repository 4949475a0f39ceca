//! MCP service implementation using rmcp.
//!
//! This module defines the ClickHouseService struct with all database tools
//! exposed via the MCP protocol using the rmcp framework's macros.

use crate::db::QueryExecutor;
use crate::error::DbResult;
use crate::tools::query::{QueryToolHandler, RunSelectQueryInput};
use crate::tools::schema::{ListTablesInput, SchemaToolHandler};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct ClickHouseService {
    /// Shared executor for all database operations
    executor: Arc<dyn QueryExecutor>,
    /// Fallback database for list_tables
    default_database: Option<String>,
    /// Tool router for MCP tool dispatch (auto-generated)
    tool_router: ToolRouter<Self>,
}

impl ClickHouseService {
    /// Create a new ClickHouseService instance.
    ///
    /// # Arguments
    ///
    /// * `executor` - Shared query executor (the ClickHouse connector in production)
    /// * `default_database` - Database used by list_tables when none is passed
    pub fn new(executor: Arc<dyn QueryExecutor>, default_database: Option<String>) -> Self {
        Self {
            executor,
            default_database,
            tool_router: Self::tool_router(),
        }
    }

    /// Probe the executor and only then build the service.
    ///
    /// A failed probe is returned to the caller; no tool is ever reachable
    /// through a service that was not probed successfully.
    pub async fn connect(
        executor: Arc<dyn QueryExecutor>,
        default_database: Option<String>,
    ) -> DbResult<Self> {
        executor.ping().await?;
        info!(default_database = ?default_database, "Liveness probe succeeded");
        Ok(Self::new(executor, default_database))
    }

    fn schema_handler(&self) -> SchemaToolHandler {
        SchemaToolHandler::new(self.executor.clone(), self.default_database.clone())
    }
}

#[tool_router]
impl ClickHouseService {
    #[tool(description = "List all databases on the ClickHouse server")]
    pub async fn list_databases(&self) -> Result<CallToolResult, McpError> {
        Ok(self.schema_handler().list_databases().await.into())
    }

    #[tool(description = "List all tables in a specified database")]
    pub async fn list_tables(
        &self,
        Parameters(input): Parameters<ListTablesInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.schema_handler().list_tables(input).await.into())
    }

    #[tool(
        description = "Run a SELECT query on the ClickHouse server. Only SELECT statements are allowed for security reasons."
    )]
    pub async fn run_select_query(
        &self,
        Parameters(input): Parameters<RunSelectQueryInput>,
    ) -> Result<CallToolResult, McpError> {
        let handler = QueryToolHandler::new(self.executor.clone());
        Ok(handler.run_select_query(input).await.into())
    }
}

#[tool_handler]
impl ServerHandler for ClickHouseService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "clickhouse-mcp".to_owned(),
                title: Some("ClickHouse MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Read-only tools for a ClickHouse server.\n\
                \n\
                ## Workflow\n\
                1. Call `list_databases` to discover databases\n\
                2. Call `list_tables` with a `database` (or rely on the configured default)\n\
                3. Call `run_select_query` with a SELECT, SHOW or DESCRIBE statement\n\
                \n\
                ## Restrictions\n\
                - Any other statement is rejected before it reaches the server\n\
                - The session runs with `readonly=1`, so writes fail on the server as well"
                    .to_string(),
            ),
        }
    }
}
