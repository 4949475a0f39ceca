//! Connection-related data models.
//!
//! This module defines the validated ClickHouse connection settings. A
//! [`ClickHouseConfig`] can only be obtained through its builder, which enforces
//! non-empty credentials and positive timeouts.

use crate::error::{DbError, DbResult};
use std::time::Duration;
use url::Url;

/// Default HTTPS port of the ClickHouse HTTP interface.
pub const DEFAULT_SECURE_PORT: u16 = 8443;

/// Default plain HTTP port of the ClickHouse HTTP interface.
pub const DEFAULT_PLAIN_PORT: u16 = 8123;

/// Validated ClickHouse connection settings.
#[derive(Clone)]
pub struct ClickHouseConfig {
    host: String,
    user: String,
    /// Sensitive - never log
    password: String,
    port: u16,
    secure: bool,
    verify: bool,
    connect_timeout: Duration,
    send_receive_timeout: Duration,
    database: Option<String>,
    certificate: Option<Vec<u8>>,
}

impl ClickHouseConfig {
    /// Start building a configuration from the required credentials.
    pub fn builder(
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> ClickHouseConfigBuilder {
        ClickHouseConfigBuilder {
            host: host.into(),
            user: user.into(),
            password: password.into(),
            port: None,
            secure: true,
            verify: true,
            connect_timeout: Duration::from_secs(crate::config::DEFAULT_CONNECT_TIMEOUT_SECS),
            send_receive_timeout: Duration::from_secs(
                crate::config::DEFAULT_SEND_RECEIVE_TIMEOUT_SECS,
            ),
            database: None,
            certificate: None,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn secure(&self) -> bool {
        self.secure
    }

    pub fn verify(&self) -> bool {
        self.verify
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn send_receive_timeout(&self) -> Duration {
        self.send_receive_timeout
    }

    /// Default database, if configured.
    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    /// PEM bytes of the trusted CA certificate, if configured.
    pub fn certificate(&self) -> Option<&[u8]> {
        self.certificate.as_deref()
    }

    /// URL scheme selected by the `secure` flag.
    pub fn scheme(&self) -> &'static str {
        if self.secure { "https" } else { "http" }
    }

    /// Base URL of the ClickHouse HTTP interface.
    pub fn base_url(&self) -> DbResult<Url> {
        let raw = format!("{}://{}:{}/", self.scheme(), self.host, self.port);
        Url::parse(&raw).map_err(|e| {
            DbError::config(format!("Invalid ClickHouse host '{}': {}", self.host, e))
        })
    }
}

impl std::fmt::Debug for ClickHouseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClickHouseConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"***")
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("verify", &self.verify)
            .field("connect_timeout", &self.connect_timeout)
            .field("send_receive_timeout", &self.send_receive_timeout)
            .field("database", &self.database)
            .field("certificate", &self.certificate.as_ref().map(Vec::len))
            .finish()
    }
}

/// Builder for [`ClickHouseConfig`].
#[derive(Debug, Clone)]
pub struct ClickHouseConfigBuilder {
    host: String,
    user: String,
    password: String,
    port: Option<u16>,
    secure: bool,
    verify: bool,
    connect_timeout: Duration,
    send_receive_timeout: Duration,
    database: Option<String>,
    certificate: Option<Vec<u8>>,
}

impl ClickHouseConfigBuilder {
    pub fn port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn send_receive_timeout(mut self, timeout: Duration) -> Self {
        self.send_receive_timeout = timeout;
        self
    }

    pub fn database(mut self, database: Option<String>) -> Self {
        self.database = database;
        self
    }

    pub fn certificate(mut self, certificate: Option<Vec<u8>>) -> Self {
        self.certificate = certificate;
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> DbResult<ClickHouseConfig> {
        let host = self.host.trim().to_string();
        if host.is_empty() {
            return Err(DbError::config("CLICKHOUSE_HOST must not be empty"));
        }
        if self.user.is_empty() {
            return Err(DbError::config("CLICKHOUSE_USER must not be empty"));
        }
        if self.password.is_empty() {
            return Err(DbError::config("CLICKHOUSE_PASSWORD must not be empty"));
        }
        if self.port == Some(0) {
            return Err(DbError::config("CLICKHOUSE_PORT must be greater than 0"));
        }
        if self.connect_timeout.is_zero() {
            return Err(DbError::config(
                "CLICKHOUSE_CONNECT_TIMEOUT_SEC must be greater than 0",
            ));
        }
        if self.send_receive_timeout.is_zero() {
            return Err(DbError::config(
                "CLICKHOUSE_SEND_RECEIVE_TIMEOUT_SEC must be greater than 0",
            ));
        }

        let port = self.port.unwrap_or(if self.secure {
            DEFAULT_SECURE_PORT
        } else {
            DEFAULT_PLAIN_PORT
        });

        Ok(ClickHouseConfig {
            host,
            user: self.user,
            password: self.password,
            port,
            secure: self.secure,
            verify: self.verify,
            connect_timeout: self.connect_timeout,
            send_receive_timeout: self.send_receive_timeout,
            database: self.database,
            certificate: self.certificate,
        })
    }
}
