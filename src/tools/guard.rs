//! Statement allow-list for the run_select_query tool.
//!
//! A prefix check on the leading keyword: only `SELECT`, `SHOW` and `DESCRIBE`
//! pass. It does not parse SQL and does not look inside comments or
//! multi-statement batches. The authoritative control is the `readonly=1`
//! session setting applied by the connector; this check only stops obviously
//! unwanted statements before they cost a round trip.

use crate::error::{DbError, DbResult};

/// Leading keywords accepted by the guard.
pub const ALLOWED_PREFIXES: &[&str] = &["SELECT", "SHOW", "DESCRIBE"];

/// Outcome of classifying a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyDecision {
    Pass,
    Reject,
}

/// Classify trimmed query text.
///
/// # Examples
///
/// ```
/// use clickhouse_mcp_server::tools::guard::{classify, PolicyDecision};
///
/// assert_eq!(classify("select 1"), PolicyDecision::Pass);
/// assert_eq!(classify("Show Tables"), PolicyDecision::Pass);
/// assert_eq!(classify("DROP TABLE users"), PolicyDecision::Reject);
/// ```
pub fn classify(sql: &str) -> PolicyDecision {
    let upper = sql.to_uppercase();
    if ALLOWED_PREFIXES
        .iter()
        .any(|prefix| upper.starts_with(prefix))
    {
        PolicyDecision::Pass
    } else {
        PolicyDecision::Reject
    }
}

/// Return `Err(DbError::PolicyRejected)` unless the query passes [`classify`].
pub fn enforce(sql: &str) -> DbResult<()> {
    match classify(sql) {
        PolicyDecision::Pass => Ok(()),
        PolicyDecision::Reject => Err(DbError::policy_rejected(sql)),
    }
}
