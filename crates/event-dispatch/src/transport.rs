//! Transport abstraction and the reqwest-backed HTTP implementation.

use crate::error::DispatchError;
use async_trait::async_trait;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default idle sockets kept per host.
pub const DEFAULT_POOL_MAX_IDLE: usize = 1000;

/// Default idle socket lifetime.
pub const DEFAULT_POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(15);

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Delivers one serialized event and reports the HTTP status.
///
/// Implementations must be cheap to call concurrently from one runtime.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` as JSON. `Ok` carries the status code whatever its class;
    /// `Err` is a transport-level failure.
    async fn post(&self, body: &[u8]) -> Result<u16, DispatchError>;

    /// Target URL, for logs.
    fn endpoint(&self) -> &str;
}

/// Keep-alive connection pool settings for one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpPoolConfig {
    pub max_idle_per_host: usize,
    pub idle_timeout: Duration,
    pub request_timeout: Duration,
    /// TCP keepalive probe interval; `None` leaves keepalive off.
    pub tcp_keepalive: Option<Duration>,
}

impl Default for HttpPoolConfig {
    fn default() -> Self {
        Self {
            max_idle_per_host: DEFAULT_POOL_MAX_IDLE,
            idle_timeout: DEFAULT_POOL_IDLE_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            tcp_keepalive: None,
        }
    }
}

/// HTTP/HTTPS transport over a pooled reqwest client.
///
/// Each worker builds its own; the pool is never shared across workers.
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, pool: &HttpPoolConfig) -> Result<Self, DispatchError> {
        let endpoint = endpoint.into();
        let client = Client::builder()
            .pool_max_idle_per_host(pool.max_idle_per_host)
            .pool_idle_timeout(pool.idle_timeout)
            .timeout(pool.request_timeout)
            .tcp_keepalive(pool.tcp_keepalive)
            .build()
            .map_err(|e| DispatchError::Client(format!("failed to build client: {e}")))?;

        tracing::debug!(
            "HTTP pool for {endpoint}: max_idle={}, idle_timeout={:?}, timeout={:?}, keepalive={:?}",
            pool.max_idle_per_host,
            pool.idle_timeout,
            pool.request_timeout,
            pool.tcp_keepalive
        );

        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, body: &[u8]) -> Result<u16, DispatchError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(CONTENT_LENGTH, body.len())
            .body(body.to_vec())
            .send()
            .await?;

        let status = response.status().as_u16();

        // Drain so the connection goes back to the pool.
        if let Err(e) = response.bytes().await {
            tracing::debug!("Failed to drain response body from {}: {e}", self.endpoint);
        }

        Ok(status)
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
