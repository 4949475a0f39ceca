//! Integration tests for the ClickHouse HTTP connector.
//!
//! A small axum app on a loopback port plays the ClickHouse HTTP interface so the
//! wire details (query settings, auth, error headers) can be checked end to end.

use axum::Router;
use axum::extract::{RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use clickhouse_mcp_server::ClickHouseService;
use clickhouse_mcp_server::db::{ClickHouseConnector, QueryExecutor};
use clickhouse_mcp_server::error::DbError;
use clickhouse_mcp_server::models::ClickHouseConfig;
use clickhouse_mcp_server::tools::{QueryToolHandler, RunSelectQueryInput};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// A request as seen by the fake server.
#[derive(Debug, Clone)]
struct Captured {
    query: String,
    authorization: Option<String>,
    body: String,
}

#[derive(Clone, Default)]
struct FakeState {
    requests: Arc<Mutex<Vec<Captured>>>,
}

const DATABASES_JSON: &str = r#"{
    "meta": [{"name": "name", "type": "String"}],
    "data": [{"name": "default"}, {"name": "system"}],
    "rows": 2,
    "statistics": {"elapsed": 0.0004, "rows_read": 2, "bytes_read": 64}
}"#;

const TOTALS_JSON: &str = r#"{
    "meta": [{"name": "zeta", "type": "UInt64"}, {"name": "alpha", "type": "UInt64"}],
    "data": [{"zeta": "1", "alpha": "2"}],
    "totals": {"zeta": "1", "alpha": "2"},
    "rows": 1
}"#;

async fn ping() -> &'static str {
    "Ok.\n"
}

async fn query(
    State(state): State<FakeState>,
    RawQuery(raw): RawQuery,
    headers: HeaderMap,
    body: String,
) -> Response {
    state.requests.lock().unwrap().push(Captured {
        query: raw.unwrap_or_default(),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        body: body.clone(),
    });

    if body.contains("missing_table") {
        return (
            StatusCode::NOT_FOUND,
            [("X-ClickHouse-Exception-Code", "60")],
            "Code: 60. DB::Exception: Table default.missing_table does not exist.",
        )
            .into_response();
    }

    let json = if body.contains("WITH TOTALS") {
        TOTALS_JSON
    } else {
        DATABASES_JSON
    };

    (
        StatusCode::OK,
        [("Content-Type", "application/json; charset=UTF-8")],
        json,
    )
        .into_response()
}

/// Start the fake server and return its port with the shared request log.
async fn spawn_fake_clickhouse() -> (u16, FakeState) {
    let state = FakeState::default();
    let app = Router::new()
        .route("/ping", get(ping))
        .route("/", post(query))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (port, state)
}

fn config_for(port: u16, database: Option<&str>) -> ClickHouseConfig {
    ClickHouseConfig::builder("127.0.0.1", "reader", "s3cret")
        .port(Some(port))
        .secure(false)
        .database(database.map(String::from))
        .build()
        .unwrap()
}

/// Bind then release a port so nothing is listening on it.
async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

#[tokio::test]
async fn test_ping_reaches_server() {
    let (port, state) = spawn_fake_clickhouse().await;

    let connector = ClickHouseConnector::new(&config_for(port, None)).unwrap();

    assert!(connector.ping().await.is_ok());
    // The probe does not run a query.
    assert!(state.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_ping_fails_when_server_unreachable() {
    let port = closed_port().await;

    let connector = ClickHouseConnector::new(&config_for(port, None)).unwrap();

    match connector.ping().await {
        Err(err @ DbError::Connection { .. }) => {
            assert!(err.is_retryable());
            assert!(err.suggestion().is_some_and(|s| s.contains("CLICKHOUSE_HOST")));
        }
        Err(other) => panic!("expected connection error, got {other:?}"),
        Ok(()) => panic!("ping should fail against a closed port"),
    }
}

#[tokio::test]
async fn test_service_connect_never_queries_unreachable_server() {
    let port = closed_port().await;
    let connector = ClickHouseConnector::new(&config_for(port, None)).unwrap();

    let service = ClickHouseService::connect(Arc::new(connector), None).await;

    assert!(service.is_err());
}

#[tokio::test]
async fn test_execute_sends_readonly_session_and_auth() {
    let (port, state) = spawn_fake_clickhouse().await;
    let connector = ClickHouseConnector::new(&config_for(port, Some("analytics"))).unwrap();

    let result = connector.execute("SHOW DATABASES").await.unwrap();

    assert_eq!(result.column_strings("name"), vec!["default", "system"]);
    assert_eq!(result.rows, Some(2));
    assert_eq!(result.meta[0].type_name, "String");

    let requests = state.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.body, "SHOW DATABASES");
    assert!(request.query.contains("default_format=JSON"));
    assert!(request.query.contains("database=analytics"));
    assert!(request.query.ends_with("readonly=1"));
    // "reader:s3cret" in base64
    assert_eq!(
        request.authorization.as_deref(),
        Some("Basic cmVhZGVyOnMzY3JldA==")
    );
}

#[tokio::test]
async fn test_engine_error_carries_exception_code() {
    let (port, _state) = spawn_fake_clickhouse().await;
    let connector = ClickHouseConnector::new(&config_for(port, None)).unwrap();

    let err = connector
        .execute("SELECT * FROM missing_table")
        .await
        .unwrap_err();

    match err {
        DbError::Database { message, code } => {
            assert_eq!(code.as_deref(), Some("60"));
            assert!(message.contains("missing_table does not exist"));
        }
        other => panic!("expected database error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_handler_recovers_after_engine_error() {
    let (port, state) = spawn_fake_clickhouse().await;
    let connector = ClickHouseConnector::new(&config_for(port, None)).unwrap();
    let handler = QueryToolHandler::new(Arc::new(connector));

    let failed = handler
        .run_select_query(RunSelectQueryInput {
            query: "SELECT * FROM missing_table".to_string(),
        })
        .await;
    assert!(failed.is_error);
    assert!(failed.text().starts_with("Error executing query: "));

    let succeeded = handler
        .run_select_query(RunSelectQueryInput {
            query: "SELECT name FROM system.databases".to_string(),
        })
        .await;
    assert!(!succeeded.is_error);
    assert!(succeeded.text().contains("\"system\""));

    assert_eq!(state.requests.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_rejected_statement_never_leaves_process() {
    let (port, state) = spawn_fake_clickhouse().await;
    let connector = ClickHouseConnector::new(&config_for(port, None)).unwrap();
    let handler = QueryToolHandler::new(Arc::new(connector));

    let envelope = handler
        .run_select_query(RunSelectQueryInput {
            query: "INSERT INTO t VALUES (1)".to_string(),
        })
        .await;

    assert!(envelope.is_error);
    assert!(state.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_query_result_passes_through_unchanged() {
    let (port, _state) = spawn_fake_clickhouse().await;
    let connector = ClickHouseConnector::new(&config_for(port, None)).unwrap();
    let handler = QueryToolHandler::new(Arc::new(connector));

    let envelope = handler
        .run_select_query(RunSelectQueryInput {
            query: "SELECT zeta, alpha FROM t GROUP BY zeta, alpha WITH TOTALS".to_string(),
        })
        .await;

    assert!(!envelope.is_error);
    let text = envelope.text();
    let zeta = text.find("\"zeta\": \"1\"").unwrap();
    let alpha = text.find("\"alpha\": \"2\"").unwrap();
    assert!(zeta < alpha, "columns must keep SELECT order:\n{text}");
    assert!(text.contains("\"totals\": {"));
}
