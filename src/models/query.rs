//! Query-related data models.
//!
//! This module defines the shape of a ClickHouse `JSON` format response.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A single row keyed by column name.
pub type Row = serde_json::Map<String, JsonValue>;

/// Column metadata as reported in the `meta` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMeta {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// Execution statistics reported by ClickHouse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryStatistics {
    #[serde(default)]
    pub elapsed: f64,
    #[serde(default)]
    pub rows_read: u64,
    #[serde(default)]
    pub bytes_read: u64,
}

/// Structured result of a query executed with `FORMAT JSON`.
///
/// Sections without a dedicated field (`totals`, `extremes`, ...) are kept in
/// `extra` so the result serializes back without losing anything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    pub meta: Vec<ColumnMeta>,
    #[serde(default)]
    pub data: Vec<Row>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows_before_limit_at_least: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<QueryStatistics>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, JsonValue>,
}

impl QueryResult {
    /// Build a result from rows only (no metadata).
    pub fn from_rows(data: Vec<Row>) -> Self {
        let rows = Some(data.len() as u64);
        Self {
            data,
            rows,
            ..Self::default()
        }
    }

    /// Number of rows in `data`.
    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    /// Collect the string values of one column, in row order.
    ///
    /// Rows where the column is missing or not a string are skipped.
    pub fn column_strings(&self, column: &str) -> Vec<String> {
        self.data
            .iter()
            .filter_map(|row| row.get(column))
            .filter_map(|value| value.as_str().map(String::from))
            .collect()
    }
}
