//! HTTP transport seam

use async_trait::async_trait;
use reqwest::Client;

use crate::config::transport as settings;

/// Sends a fully built HTTP request
///
/// Implementations must be safe for concurrent use: one client shares a
/// single transport across every call. `reqwest::Client` pools connections
/// internally and satisfies this.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: reqwest::Request) -> Result<reqwest::Response, reqwest::Error>;
}

#[async_trait]
impl Transport for Client {
    async fn send(&self, request: reqwest::Request) -> Result<reqwest::Response, reqwest::Error> {
        self.execute(request).await
    }
}

/// Default pooled HTTP client
///
/// No overall request timeout is set; deadlines come from the caller's
/// `Context`.
pub fn default_http_client() -> Client {
    Client::builder()
        // Connection pool settings - reuse connections
        .pool_max_idle_per_host(settings::POOL_MAX_IDLE_PER_HOST)
        .pool_idle_timeout(settings::POOL_IDLE_TIMEOUT)
        // TCP keepalive to maintain connections
        .tcp_keepalive(settings::TCP_KEEPALIVE)
        .connect_timeout(settings::CONNECT_TIMEOUT)
        .build()
        .unwrap_or_else(|_| Client::new())
}
