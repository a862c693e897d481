//! HTTP transport defaults for the Rate-Limited Fetcher
//!
//! Mirrors the transport defaults spelled out in the component design:
//! connection pool sizing and the handshake/response/continue timeouts a
//! well-behaved crawler applies regardless of source.

use std::time::Duration;

use crate::error::{CrawlCoreError, CrawlResult};

/// Explicit HTTP transport defaults.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub max_idle_conns: usize,
    pub max_idle_conns_per_host: usize,
    pub idle_conn_timeout: Duration,
    pub tls_handshake_timeout: Duration,
    pub response_header_timeout: Duration,
    pub expect_continue_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_idle_conns: 100,
            max_idle_conns_per_host: 10,
            idle_conn_timeout: Duration::from_secs(90),
            tls_handshake_timeout: Duration::from_secs(10),
            response_header_timeout: Duration::from_secs(30),
            expect_continue_timeout: Duration::from_secs(1),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this transport configuration.
    ///
    /// `robots.txt` is deliberately never consulted and revisits are never
    /// deduplicated at this layer; the Frontier owns visitation policy.
    pub fn build_client(&self, user_agent: &str) -> CrawlResult<reqwest::Client> {
        reqwest::Client::builder()
            .user_agent(user_agent.to_string())
            .pool_max_idle_per_host(self.max_idle_conns_per_host)
            .pool_idle_timeout(self.idle_conn_timeout)
            .connect_timeout(self.tls_handshake_timeout)
            .timeout(self.response_header_timeout)
            .build()
            .map_err(|e| CrawlCoreError::Other(anyhow::anyhow!(e)))
    }
}
