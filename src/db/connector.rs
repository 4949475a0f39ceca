//! ClickHouse connector over the HTTP interface.
//!
//! Owns the single long-lived HTTP session to ClickHouse. Every request carries
//! `readonly=1`, so the server rejects writes even if a statement slips past the
//! policy guard. Responses are requested gzip-compressed; requests are sent
//! uncompressed.

use crate::db::QueryExecutor;
use crate::error::{DbError, DbResult};
use crate::models::{ClickHouseConfig, QueryResult};
use async_trait::async_trait;
use reqwest::{Certificate, Client, Response};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

/// Response header carrying the ClickHouse exception code.
const EXCEPTION_CODE_HEADER: &str = "X-ClickHouse-Exception-Code";

/// Connector owning the HTTP session to ClickHouse.
pub struct ClickHouseConnector {
    client: Client,
    query_url: Url,
    ping_url: Url,
    user: String,
    password: String,
    request_timeout: Duration,
}

impl ClickHouseConnector {
    /// Build the connector from validated settings.
    ///
    /// No network traffic happens here; call [`QueryExecutor::ping`] to verify
    /// the server is reachable.
    pub fn new(config: &ClickHouseConfig) -> DbResult<Self> {
        let request_timeout = config.connect_timeout();

        let mut builder = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(request_timeout)
            .gzip(true);

        if config.secure() {
            if let Some(pem) = config.certificate() {
                for cert in Self::parse_certificates(pem)? {
                    builder = builder.add_root_certificate(cert);
                }
            }
            if !config.verify() {
                warn!("TLS certificate verification is disabled");
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        let client = builder.build()?;
        let query_url = Self::query_url(config)?;
        let ping_url = config
            .base_url()?
            .join("ping")
            .map_err(|e| DbError::config(format!("Invalid ping URL: {}", e)))?;

        Ok(Self {
            client,
            query_url,
            ping_url,
            user: config.user().to_string(),
            password: config.password().to_string(),
            request_timeout,
        })
    }

    /// Build the query endpoint with the session settings applied.
    ///
    /// `readonly` goes last: ClickHouse applies URL settings in order and refuses
    /// further setting changes once read-only mode is active.
    pub fn query_url(config: &ClickHouseConfig) -> DbResult<Url> {
        let mut url = config.base_url()?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("enable_http_compression", "1")
                .append_pair("default_format", "JSON")
                .append_pair(
                    "send_timeout",
                    &config.send_receive_timeout().as_secs().to_string(),
                )
                .append_pair(
                    "receive_timeout",
                    &config.send_receive_timeout().as_secs().to_string(),
                );
            if let Some(database) = config.database() {
                pairs.append_pair("database", database);
            }
            pairs.append_pair("readonly", "1");
        }
        Ok(url)
    }

    /// Parse PEM bytes into the CA certificates to trust.
    ///
    /// Input without a single certificate block is rejected.
    fn parse_certificates(pem: &[u8]) -> DbResult<Vec<Certificate>> {
        let certs = Certificate::from_pem_bundle(pem)
            .map_err(|e| DbError::config(format!("Invalid CA certificate: {}", e)))?;
        if certs.is_empty() {
            return Err(DbError::config(
                "Invalid CA certificate: no PEM certificate found",
            ));
        }
        Ok(certs)
    }

    /// The endpoint used for queries.
    pub fn endpoint(&self) -> &Url {
        &self.query_url
    }

    /// Map a transport failure, attaching the configured timeout when it expired.
    fn request_error(&self, operation: &str, err: reqwest::Error) -> DbError {
        if err.is_timeout() {
            DbError::timeout(operation, self.request_timeout.as_secs())
        } else {
            err.into()
        }
    }

    /// Turn a non-success response into a database error.
    async fn engine_error(response: Response) -> DbError {
        let status = response.status();
        let code = response
            .headers()
            .get(EXCEPTION_CODE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = response.text().await.unwrap_or_default();
        let message = match body.trim() {
            "" => format!("ClickHouse returned HTTP {}", status),
            text => text.to_string(),
        };
        warn!(status = %status, code = ?code, "ClickHouse rejected request");
        DbError::database(message, code)
    }
}

#[async_trait]
impl QueryExecutor for ClickHouseConnector {
    async fn execute(&self, sql: &str) -> DbResult<QueryResult> {
        let start = Instant::now();
        debug!(sql = %sql, "Executing query");

        let response = self
            .client
            .post(self.query_url.clone())
            .basic_auth(&self.user, Some(&self.password))
            .body(sql.to_string())
            .send()
            .await
            .map_err(|e| self.request_error("query", e))?;

        if !response.status().is_success() {
            return Err(Self::engine_error(response).await);
        }

        let result: QueryResult = response
            .json()
            .await
            .map_err(|e| self.request_error("query", e))?;

        debug!(
            row_count = result.row_count(),
            execution_time_ms = start.elapsed().as_millis() as u64,
            "Query completed"
        );
        Ok(result)
    }

    async fn ping(&self) -> DbResult<()> {
        let response = self
            .client
            .get(self.ping_url.clone())
            .send()
            .await
            .map_err(|e| self.request_error("ping", e))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(DbError::connection(
                format!("Ping returned HTTP {}", status),
                "Check that CLICKHOUSE_HOST and CLICKHOUSE_PORT point at the HTTP interface",
            ));
        }

        info!(url = %self.ping_url, "ClickHouse is reachable");
        Ok(())
    }
}
