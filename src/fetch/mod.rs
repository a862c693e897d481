//! Rate-Limited Fetcher
//!
//! Issues HTTP GETs subject to per-domain-glob `{Delay, RandomDelay,
//! Parallelism}` limits: at most `Parallelism` concurrent requests per glob,
//! and at least `Delay + uniform(0, RandomDelay)` between consecutive
//! requests to the same glob. `robots.txt` is never consulted; revisit
//! deduplication is the Frontier's job, not the Fetcher's.

mod domain_semaphore;
mod pacer;
mod rules;
mod transport;

pub use domain_semaphore::GlobLimiter;
pub use pacer::DomainPacer;
pub use rules::{compile_glob_pattern, RateLimitRule};
pub use transport::TransportConfig;

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use tokio::sync::Notify;

use crate::error::{CrawlCoreError, CrawlResult};

/// A fetched document: the parts the Classifier and Extractors need.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

/// Rate-limited HTTP fetcher owning the transport and per-glob limit rules.
pub struct Fetcher {
    client: reqwest::Client,
    rules: RwLock<Vec<RateLimitRule>>,
    pacer: DomainPacer,
    limiter: GlobLimiter,
    request_timeout: RwLock<Duration>,
    max_depth: AtomicU32,
    in_flight: AtomicUsize,
    drained: Notify,
}

impl Fetcher {
    /// Build a fetcher with the transport defaults and no rate-limit rules.
    /// Without a matching rule, `Visit` proceeds with no pacing and
    /// unbounded per-glob concurrency.
    pub fn new(user_agent: &str, request_timeout: Duration) -> CrawlResult<Self> {
        Self::with_transport(&TransportConfig::default(), user_agent, request_timeout)
    }

    pub fn with_transport(
        transport: &TransportConfig,
        user_agent: &str,
        request_timeout: Duration,
    ) -> CrawlResult<Self> {
        Ok(Self {
            client: transport.build_client(user_agent)?,
            rules: RwLock::new(Vec::new()),
            pacer: DomainPacer::new(),
            limiter: GlobLimiter::new(),
            request_timeout: RwLock::new(request_timeout),
            max_depth: AtomicU32::new(u32::MAX),
            in_flight: AtomicUsize::new(0),
            drained: Notify::new(),
        })
    }

    /// Replace the fetcher's transport, rebuilding the underlying client.
    pub fn set_transport(&mut self, transport: &TransportConfig, user_agent: &str) -> CrawlResult<()> {
        self.client = transport.build_client(user_agent)?;
        Ok(())
    }

    /// Register (or replace) a domain-glob rate-limit rule.
    pub fn limit(&self, rule: RateLimitRule) {
        let mut rules = self.rules.write().expect("rate limit rules lock poisoned");
        rules.retain(|existing| existing.glob != rule.glob);
        rules.push(rule);
    }

    pub fn set_request_timeout(&self, timeout: Duration) {
        *self.request_timeout.write().expect("timeout lock poisoned") = timeout;
    }

    pub fn set_max_depth(&self, depth: u32) {
        self.max_depth.store(depth, Ordering::Relaxed);
    }

    #[must_use]
    pub fn max_depth(&self) -> u32 {
        self.max_depth.load(Ordering::Relaxed)
    }

    /// Issue a GET to `url`, honoring whichever rule's glob matches the
    /// URL's host (first match wins), or proceeding unthrottled if none do.
    pub async fn visit(&self, url: &str) -> CrawlResult<FetchedPage> {
        let host = url::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .ok_or_else(|| CrawlCoreError::InvalidUrl(url.to_string()))?;

        let (glob, delay, random_delay, parallelism) = self.matching_rule(&host);

        let wait = self.pacer.reserve(&glob, delay, random_delay);
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }

        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let _permit = self.limiter.acquire(&glob, parallelism).await;
        let result = self.do_visit(url).await;
        if self.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.drained.notify_waiters();
        }
        result
    }

    async fn do_visit(&self, url: &str) -> CrawlResult<FetchedPage> {
        let timeout = *self.request_timeout.read().expect("timeout lock poisoned");
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| CrawlCoreError::Other(anyhow::anyhow!(e)))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|e| CrawlCoreError::Other(anyhow::anyhow!(e)))?;

        Ok(FetchedPage {
            url: url.to_string(),
            status,
            headers,
            body,
        })
    }

    /// Block until all in-flight fetches have completed.
    pub async fn wait(&self) {
        while self.in_flight.load(Ordering::SeqCst) > 0 {
            self.drained.notified().await;
        }
    }

    fn matching_rule(&self, host: &str) -> (String, Duration, Duration, usize) {
        let rules = self.rules.read().expect("rate limit rules lock poisoned");
        rules
            .iter()
            .find(|r| r.matches(host))
            .map(|r| (r.glob.clone(), r.delay, r.random_delay, r.parallelism))
            .unwrap_or_else(|| ("*".to_string(), Duration::ZERO, Duration::ZERO, usize::MAX))
    }
}

/// Shared-ownership handle used by crawler callbacks spawned per response.
pub type SharedFetcher = Arc<Fetcher>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unlimited_without_a_matching_rule() {
        let fetcher = Fetcher::new("crawlcore-test", Duration::from_secs(5)).unwrap();
        let (glob, delay, random_delay, parallelism) = fetcher.matching_rule("example.com");
        assert_eq!(glob, "*");
        assert_eq!(delay, Duration::ZERO);
        assert_eq!(random_delay, Duration::ZERO);
        assert_eq!(parallelism, usize::MAX);
    }

    #[tokio::test]
    async fn limit_registers_a_catch_all_rule() {
        let fetcher = Fetcher::new("crawlcore-test", Duration::from_secs(5)).unwrap();
        fetcher.limit(RateLimitRule::catch_all(Duration::from_millis(50), Duration::ZERO, 2).unwrap());
        let (glob, delay, _, parallelism) = fetcher.matching_rule("example.com");
        assert_eq!(glob, "*");
        assert_eq!(delay, Duration::from_millis(50));
        assert_eq!(parallelism, 2);
    }

    #[tokio::test]
    async fn wait_returns_immediately_when_idle() {
        let fetcher = Fetcher::new("crawlcore-test", Duration::from_secs(5)).unwrap();
        tokio::time::timeout(Duration::from_millis(50), fetcher.wait())
            .await
            .expect("wait() should not block with no in-flight requests");
    }
}
