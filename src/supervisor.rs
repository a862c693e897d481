//! Supervisor / Lifecycle Glue
//!
//! Coordinates shutdown requested via context cancellation, a
//! [`SignalHandler`], or an explicit `stop` call: cancels the Crawler, stops
//! the Job Service, and logs the terminal state — all bounded by
//! `DefaultStopTimeout`. `shutdown` is safe to call from more than one
//! trigger at once; the underlying `Crawler::stop`/`JobService::stop` are
//! themselves idempotent, so a duplicate shutdown is a harmless no-op.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::crawler::DEFAULT_STOP_TIMEOUT;
use crate::error::{CrawlCoreError, CrawlResult};
use crate::job::JobService;

/// External trigger for a shutdown request, installed by whichever
/// collaborator translates OS signals or container lifecycle events; the
/// Supervisor never depends on a concrete signal source directly.
pub trait SignalHandler: Send + Sync {
    fn request_shutdown(&self) -> CancellationToken;
}

/// A `SignalHandler` backed by a single `CancellationToken`, cloned out to
/// every caller that wants to observe or trigger the shutdown.
pub struct TokenSignalHandler {
    token: CancellationToken,
}

impl TokenSignalHandler {
    #[must_use]
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    pub fn trigger(&self) {
        self.token.cancel();
    }
}

impl Default for TokenSignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalHandler for TokenSignalHandler {
    fn request_shutdown(&self) -> CancellationToken {
        self.token.clone()
    }
}

/// Coordinates graceful shutdown of one Job Service.
pub struct Supervisor {
    job: Arc<JobService>,
    stop_timeout: Duration,
}

impl Supervisor {
    #[must_use]
    pub fn new(job: Arc<JobService>) -> Self {
        Self {
            job,
            stop_timeout: DEFAULT_STOP_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_stop_timeout(mut self, timeout: Duration) -> Self {
        self.stop_timeout = timeout;
        self
    }

    /// Block until `signal` fires, then run a coordinated shutdown.
    pub async fn run(&self, signal: &dyn SignalHandler) -> CrawlResult<()> {
        signal.request_shutdown().cancelled().await;
        self.shutdown().await
    }

    /// Stop the Job Service within `stop_timeout`, logging the terminal
    /// state regardless of outcome.
    pub async fn shutdown(&self) -> CrawlResult<()> {
        let job = self.job.clone();
        let result = tokio::time::timeout(self.stop_timeout, async move { job.stop().await }).await;

        match result {
            Ok(Ok(())) => {
                tracing::info!("crawler stopped");
                Ok(())
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "crawler stop returned an error");
                Err(e)
            }
            Err(_) => {
                let message = "failed to stop crawler gracefully".to_string();
                tracing::error!("{message}");
                Err(CrawlCoreError::Other(anyhow::anyhow!(message)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::Crawler;
    use crate::sources::InMemorySources;
    use crate::storage::InMemoryIndexStore;

    #[tokio::test]
    async fn shutdown_before_start_is_a_harmless_noop() {
        let crawler = Arc::new(Crawler::new(
            Arc::new(InMemorySources::new()),
            Arc::new(InMemoryIndexStore::new()),
        ));
        let job = Arc::new(JobService::new(crawler, "demo"));
        let supervisor = Supervisor::new(job);
        supervisor.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn signal_handler_cancels_on_trigger() {
        let handler = TokenSignalHandler::new();
        let token = handler.request_shutdown();
        assert!(!token.is_cancelled());
        handler.trigger();
        assert!(token.is_cancelled());
    }
}
