//! ClickHouse MCP Server - Main entry point.
//!
//! This server provides MCP (Model Context Protocol) tools for AI assistants
//! to run read-only queries against a ClickHouse server.

use clap::Parser;
use clickhouse_mcp_server::ClickHouseService;
use clickhouse_mcp_server::config::{Config, TransportMode};
use clickhouse_mcp_server::db::ClickHouseConnector;
use clickhouse_mcp_server::transport::{HttpTransport, StdioTransport, Transport};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr: stdout belongs to the stdio transport.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse configuration from command line and environment
    let config = Config::parse();

    init_tracing(&config);

    info!(
        transport = %config.transport,
        "Starting ClickHouse MCP Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let clickhouse = match config.clickhouse_config() {
        Ok(clickhouse) => clickhouse,
        Err(e) => {
            error!(error = %e, suggestion = ?e.suggestion(), "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    info!(
        host = %clickhouse.host(),
        port = clickhouse.port(),
        secure = clickhouse.secure(),
        database = ?clickhouse.database(),
        "Connecting to ClickHouse"
    );

    let connector = match ClickHouseConnector::new(&clickhouse) {
        Ok(connector) => connector,
        Err(e) => {
            error!(
                error = %e,
                suggestion = ?e.suggestion(),
                "Failed to build ClickHouse client"
            );
            return ExitCode::FAILURE;
        }
    };

    debug!(endpoint = %connector.endpoint(), "ClickHouse client ready");

    let default_database = clickhouse.database().map(String::from);
    let service = match ClickHouseService::connect(Arc::new(connector), default_database).await {
        Ok(service) => service,
        Err(e) => {
            error!(
                status = "error",
                message = "Failed to connect to ClickHouse server",
                error = %e,
                suggestion = ?e.suggestion(),
                retryable = e.is_retryable()
            );
            return ExitCode::FAILURE;
        }
    };

    let result = match config.transport {
        TransportMode::Stdio => {
            info!("Using stdio transport");
            StdioTransport::new(service).run().await
        }
        TransportMode::Http => {
            info!(
                host = %config.http_host,
                port = config.http_port,
                endpoint = %config.mcp_endpoint,
                "Using HTTP transport"
            );
            HttpTransport::new(
                service,
                &config.http_host,
                config.http_port,
                &config.mcp_endpoint,
            )
            .run()
            .await
        }
    };

    if let Err(e) = result {
        error!(error = %e, "Server error");
        return ExitCode::FAILURE;
    }

    info!("Server shutdown complete");
    ExitCode::SUCCESS
}
