//! Schema listing tools.
//!
//! This module implements the `list_databases` and `list_tables` MCP tools.

use crate::db::QueryExecutor;
use crate::error::{DbError, DbResult};
use crate::models::ResultEnvelope;
use crate::tools::format;
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// Input for the list_tables tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListTablesInput {
    /// The database name to list tables from
    #[serde(default)]
    pub database: Option<String>,
}

/// Handler for schema listing.
pub struct SchemaToolHandler {
    executor: Arc<dyn QueryExecutor>,
    default_database: Option<String>,
}

impl SchemaToolHandler {
    /// Create a new schema tool handler.
    pub fn new(executor: Arc<dyn QueryExecutor>, default_database: Option<String>) -> Self {
        Self {
            executor,
            default_database,
        }
    }

    /// Handle the list_databases tool call.
    pub async fn list_databases(&self) -> ResultEnvelope {
        format::from_result("listing databases", self.try_list_databases().await)
    }

    async fn try_list_databases(&self) -> DbResult<String> {
        let result = self.executor.execute("SHOW DATABASES").await?;
        let names = result.column_strings("name");

        info!(count = names.len(), "Listed databases");

        Ok(format!(
            "Found the following databases on the ClickHouse server: {}",
            names.join(", ")
        ))
    }

    /// Handle the list_tables tool call.
    pub async fn list_tables(&self, input: ListTablesInput) -> ResultEnvelope {
        format::from_result("listing tables", self.try_list_tables(input).await)
    }

    async fn try_list_tables(&self, input: ListTablesInput) -> DbResult<String> {
        let database = self.resolve_database(input.database.as_deref())?;
        let result = self
            .executor
            .execute(&format!("SHOW TABLES FROM {}", database))
            .await?;

        info!(database = %database, count = result.row_count(), "Listed tables");

        if result.data.is_empty() {
            return Ok(format!("No tables found in database: {}", database));
        }

        Ok(format!(
            "Found the following tables in database {}: {}",
            database,
            result.column_strings("name").join(", ")
        ))
    }

    /// Pick the explicit database, falling back to the configured default.
    ///
    /// Blank values count as absent. With nothing to fall back on the call is
    /// rejected instead of sending `SHOW TABLES FROM ` to the server.
    fn resolve_database(&self, requested: Option<&str>) -> DbResult<String> {
        requested
            .map(str::trim)
            .filter(|db| !db.is_empty())
            .or(self.default_database.as_deref())
            .map(String::from)
            .ok_or(DbError::DatabaseRequired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QueryResult;
    use async_trait::async_trait;

    struct NoopExecutor;

    #[async_trait]
    impl QueryExecutor for NoopExecutor {
        async fn execute(&self, _sql: &str) -> DbResult<QueryResult> {
            Ok(QueryResult::default())
        }

        async fn ping(&self) -> DbResult<()> {
            Ok(())
        }
    }

    fn handler(default_database: Option<&str>) -> SchemaToolHandler {
        SchemaToolHandler::new(Arc::new(NoopExecutor), default_database.map(String::from))
    }

    #[test]
    fn test_list_tables_input_deserialization() {
        let input: ListTablesInput = serde_json::from_str(r#"{"database": "logs"}"#).unwrap();
        assert_eq!(input.database.as_deref(), Some("logs"));

        let input: ListTablesInput = serde_json::from_str("{}").unwrap();
        assert!(input.database.is_none());
    }

    #[test]
    fn test_resolve_database_prefers_input() {
        let handler = handler(Some("default"));
        assert_eq!(handler.resolve_database(Some("logs")).unwrap(), "logs");
        assert_eq!(handler.resolve_database(Some(" logs ")).unwrap(), "logs");
    }

    #[test]
    fn test_resolve_database_falls_back_to_default() {
        let handler = handler(Some("default"));
        assert_eq!(handler.resolve_database(None).unwrap(), "default");
        assert_eq!(handler.resolve_database(Some("   ")).unwrap(), "default");
    }

    #[test]
    fn test_resolve_database_requires_some_value() {
        let handler = handler(None);
        assert!(matches!(
            handler.resolve_database(None),
            Err(DbError::DatabaseRequired)
        ));
        assert!(matches!(
            handler.resolve_database(Some("")),
            Err(DbError::DatabaseRequired)
        ));
    }

    #[test]
    fn test_list_tables_empty_result() {
        let envelope = tokio_test::block_on(handler(None).list_tables(ListTablesInput {
            database: Some("empty_db".to_string()),
        }));
        assert!(!envelope.is_error);
        assert_eq!(envelope.text(), "No tables found in database: empty_db");
    }
}
