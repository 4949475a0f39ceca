//! Response formatting for MCP tools.
//!
//! Functions mapping handler outcomes into [`ResultEnvelope`]s, plus the
//! conversion into rmcp's `CallToolResult` used at the protocol boundary.
//! Failed tool calls are logged here, once, before they become envelopes.

use crate::error::{DbError, DbResult};
use crate::models::{EnvelopeContent, QueryResult, ResultEnvelope};
use rmcp::model::{CallToolResult, Content};
use tracing::warn;

/// Wrap text in a success envelope.
pub fn success(text: impl Into<String>) -> ResultEnvelope {
    ResultEnvelope {
        content: vec![EnvelopeContent::Text { text: text.into() }],
        is_error: false,
    }
}

/// Wrap text in an error envelope.
pub fn error(text: impl Into<String>) -> ResultEnvelope {
    ResultEnvelope {
        content: vec![EnvelopeContent::Text { text: text.into() }],
        is_error: true,
    }
}

/// Error envelope of the form `Error <action>: <message>`.
pub fn failure(action: &str, err: &DbError) -> ResultEnvelope {
    error(format!("Error {}: {}", action, err))
}

/// Map a handler outcome into an envelope.
pub fn from_result(action: &str, result: DbResult<String>) -> ResultEnvelope {
    match result {
        Ok(text) => success(text),
        Err(err) => {
            warn!(
                action,
                error = %err,
                suggestion = ?err.suggestion(),
                retryable = err.is_retryable(),
                "Tool call failed"
            );
            failure(action, &err)
        }
    }
}

/// Serialize a query result as indented JSON.
pub fn pretty_json(result: &QueryResult) -> DbResult<String> {
    serde_json::to_string_pretty(result)
        .map_err(|e| DbError::internal(format!("Failed to serialize result: {}", e)))
}

impl From<ResultEnvelope> for CallToolResult {
    fn from(envelope: ResultEnvelope) -> Self {
        let content = envelope
            .content
            .into_iter()
            .map(|c| match c {
                EnvelopeContent::Text { text } => Content::text(text),
            })
            .collect();
        if envelope.is_error {
            CallToolResult::error(content)
        } else {
            CallToolResult::success(content)
        }
    }
}
