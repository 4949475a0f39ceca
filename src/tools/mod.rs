//! MCP tool implementations.
//!
//! This module contains all database tool handlers:
//! - `list_databases`: List databases on the ClickHouse server
//! - `list_tables`: List tables in a database
//! - `run_select_query`: Execute SELECT, SHOW and DESCRIBE queries
//! - `guard`: Statement allow-list applied before execution
//! - `format`: Result envelope construction

pub mod format;
pub mod guard;
pub mod query;
pub mod schema;

pub use query::{QueryToolHandler, RunSelectQueryInput};
pub use schema::{ListTablesInput, SchemaToolHandler};
