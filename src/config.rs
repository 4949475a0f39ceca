//! Configuration handling for the ClickHouse MCP Server.
//!
//! This module provides configuration management via CLI arguments and environment variables.
//! The raw [`Config`] is parsed once at startup and turned into a validated
//! [`ClickHouseConfig`] which the connector owns for the lifetime of the process.

use crate::error::{DbError, DbResult};
use crate::models::ClickHouseConfig;
use clap::{ArgAction, Parser, ValueEnum};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_MCP_ENDPOINT: &str = "/";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SEND_RECEIVE_TIMEOUT_SECS: u64 = 60;

/// Transport mode for the MCP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TransportMode {
    /// Standard input/output (for CLI integration)
    #[default]
    Stdio,
    /// HTTP with Server-Sent Events (for web clients)
    Http,
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdio => write!(f, "stdio"),
            Self::Http => write!(f, "http"),
        }
    }
}

/// Parse a boolean flag where only a case-insensitive "true" enables it.
fn parse_flag(value: &str) -> Result<bool, String> {
    Ok(value.trim().eq_ignore_ascii_case("true"))
}

/// Configuration for the ClickHouse MCP Server.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "clickhouse-mcp-server",
    about = "MCP server exposing read-only ClickHouse queries to AI assistants",
    version,
    author
)]
pub struct Config {
    /// ClickHouse server host name
    #[arg(long = "host", env = "CLICKHOUSE_HOST")]
    pub host: String,

    /// ClickHouse user name
    #[arg(long = "user", env = "CLICKHOUSE_USER")]
    pub user: String,

    /// ClickHouse password
    #[arg(long = "password", env = "CLICKHOUSE_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// ClickHouse HTTP port (default: 8443 when secure, 8123 otherwise)
    #[arg(long = "port", env = "CLICKHOUSE_PORT")]
    pub port: Option<u16>,

    /// Use HTTPS for the ClickHouse connection
    #[arg(
        long = "secure",
        env = "CLICKHOUSE_SECURE",
        default_value = "true",
        value_parser = parse_flag,
        action = ArgAction::Set
    )]
    pub secure: bool,

    /// Verify the server TLS certificate
    #[arg(
        long = "verify",
        env = "CLICKHOUSE_VERIFY",
        default_value = "true",
        value_parser = parse_flag,
        action = ArgAction::Set
    )]
    pub verify: bool,

    /// Connection and per-request timeout in seconds
    #[arg(
        long = "connect-timeout",
        default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS,
        env = "CLICKHOUSE_CONNECT_TIMEOUT_SEC"
    )]
    pub connect_timeout: u64,

    /// Server-side send/receive timeout in seconds
    #[arg(
        long = "send-receive-timeout",
        default_value_t = DEFAULT_SEND_RECEIVE_TIMEOUT_SECS,
        env = "CLICKHOUSE_SEND_RECEIVE_TIMEOUT_SEC"
    )]
    pub send_receive_timeout: u64,

    /// Default database for list_tables and unqualified queries
    #[arg(long = "database", env = "CLICKHOUSE_DATABASE")]
    pub database: Option<String>,

    /// Path to a PEM encoded CA certificate trusted for the ClickHouse connection
    #[arg(long = "cert-path", value_name = "PATH", env = "CLICKHOUSE_CERT_PATH")]
    pub cert_path: Option<String>,

    /// Transport mode (stdio or http)
    #[arg(
        short,
        long,
        value_enum,
        default_value = "stdio",
        env = "MCP_TRANSPORT"
    )]
    pub transport: TransportMode,

    /// HTTP host to bind to (only used with http transport)
    #[arg(
        long,
        default_value = DEFAULT_HTTP_HOST,
        env = "MCP_HTTP_HOST"
    )]
    pub http_host: String,

    /// HTTP port to bind to (only used with http transport)
    #[arg(
        long,
        default_value_t = DEFAULT_HTTP_PORT,
        env = "MCP_HTTP_PORT"
    )]
    pub http_port: u16,

    /// MCP endpoint path (only used with http transport)
    #[arg(
        long,
        default_value = DEFAULT_MCP_ENDPOINT,
        env = "MCP_ENDPOINT"
    )]
    pub mcp_endpoint: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "MCP_LOG_LEVEL")]
    pub log_level: String,

    /// Enable JSON logging format
    #[arg(long, env = "MCP_JSON_LOGS")]
    pub json_logs: bool,
}

impl Config {
    /// Create a configuration with the required credentials and every other field at its default.
    #[cfg(test)]
    pub(crate) fn with_credentials(
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            user: user.into(),
            password: password.into(),
            port: None,
            secure: true,
            verify: true,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT_SECS,
            send_receive_timeout: DEFAULT_SEND_RECEIVE_TIMEOUT_SECS,
            database: None,
            cert_path: None,
            transport: TransportMode::Stdio,
            http_host: DEFAULT_HTTP_HOST.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            mcp_endpoint: DEFAULT_MCP_ENDPOINT.to_string(),
            log_level: "info".to_string(),
            json_logs: false,
        }
    }

    /// Build the validated ClickHouse connection settings.
    ///
    /// Loads the CA certificate when a path is configured; an unreadable file is a
    /// configuration error and must abort startup.
    pub fn clickhouse_config(&self) -> DbResult<ClickHouseConfig> {
        let certificate = self
            .cert_path
            .as_deref()
            .map(|path| load_certificate(Path::new(path)))
            .transpose()?;

        let database = self
            .database
            .as_deref()
            .map(str::trim)
            .filter(|db| !db.is_empty())
            .map(String::from);

        ClickHouseConfig::builder(&self.host, &self.user, &self.password)
            .port(self.port)
            .secure(self.secure)
            .verify(self.verify)
            .connect_timeout(self.connect_timeout_duration())
            .send_receive_timeout(self.send_receive_timeout_duration())
            .database(database)
            .certificate(certificate)
            .build()
    }

    /// Get the connection timeout as a Duration.
    pub fn connect_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }

    /// Get the send/receive timeout as a Duration.
    pub fn send_receive_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.send_receive_timeout)
    }
}

/// Read a CA certificate from disk.
pub fn load_certificate(path: &Path) -> DbResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        DbError::config(format!(
            "Failed to load certificate from {}: {}",
            path.display(),
            e
        ))
    })
}
