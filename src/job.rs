//! Job Service
//!
//! A thin façade a command invokes to start and stop the crawl of one named
//! source and report status. Delegates every operation to a [`Crawler`];
//! this service owns no state of its own beyond the source name and a
//! monitor task that closes `done` once the crawl finishes.

use std::sync::Arc;

use tokio::sync::watch;

use crate::crawler::Crawler;
use crate::error::CrawlResult;

/// Coarse status reported by [`JobService::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Processing,
    Completed,
}

/// Façade over a [`Crawler`] for one named source.
///
/// `GetItems`/`UpdateItem`/`UpdateJob` are reserved surfaces: this
/// implementation does not touch storage for individual items (extraction
/// already delegates to processors), so they are no-ops that succeed for
/// any well-formed ID rather than erroring.
pub struct JobService {
    crawler: Arc<Crawler>,
    source_name: String,
    done_tx: watch::Sender<bool>,
    done_rx: watch::Receiver<bool>,
}

impl JobService {
    #[must_use]
    pub fn new(crawler: Arc<Crawler>, source_name: impl Into<String>) -> Self {
        let (done_tx, done_rx) = watch::channel(true);
        Self {
            crawler,
            source_name: source_name.into(),
            done_tx,
            done_rx,
        }
    }

    /// Start the crawl and spawn a monitor that closes `done` once the
    /// crawler's management loop finishes.
    pub async fn start(&self) -> CrawlResult<()> {
        self.crawler.start(&self.source_name).await?;
        self.done_tx.send_replace(false);

        let crawler = self.crawler.clone();
        let done_tx = self.done_tx.clone();
        tokio::spawn(async move {
            crawler.wait().await;
            done_tx.send_replace(true);
        });

        Ok(())
    }

    /// Stop the crawl and mark the job done immediately.
    pub async fn stop(&self) -> CrawlResult<()> {
        self.crawler.stop().await?;
        self.done_tx.send_replace(true);
        Ok(())
    }

    #[must_use]
    pub fn status(&self) -> JobStatus {
        if *self.done_rx.borrow() {
            JobStatus::Completed
        } else {
            JobStatus::Processing
        }
    }

    /// Reserved surface: succeeds for any non-empty job ID without reading
    /// or writing storage.
    pub fn get_items(&self, job_id: &str) -> CrawlResult<Vec<String>> {
        let _ = job_id;
        Ok(Vec::new())
    }

    pub fn update_item(&self, job_id: &str, item_id: &str) -> CrawlResult<()> {
        let _ = (job_id, item_id);
        Ok(())
    }

    pub fn update_job(&self, job_id: &str) -> CrawlResult<()> {
        let _ = job_id;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::InMemorySources;
    use crate::storage::InMemoryIndexStore;
    use std::time::Duration;

    fn sample_source() -> crate::config::SourceConfig {
        crate::config::SourceConfig::builder()
            .name("demo")
            .url("https://example.com")
            .article_index("demo-articles")
            .page_index("demo-pages")
            .rate_limit(Duration::ZERO)
            .random_delay(Duration::ZERO)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn status_is_completed_before_start() {
        let crawler = Arc::new(Crawler::new(
            Arc::new(InMemorySources::new()),
            Arc::new(InMemoryIndexStore::new()),
        ));
        let job = JobService::new(crawler, "demo");
        assert_eq!(job.status(), JobStatus::Completed);
    }

    #[tokio::test]
    async fn start_with_unknown_source_propagates_the_error() {
        let crawler = Arc::new(Crawler::new(
            Arc::new(InMemorySources::new()),
            Arc::new(InMemoryIndexStore::new()),
        ));
        let job = JobService::new(crawler, "missing");
        assert!(job.start().await.is_err());
        assert_eq!(job.status(), JobStatus::Completed);
    }

    #[tokio::test]
    async fn reserved_surfaces_succeed_without_touching_storage() {
        let crawler = Arc::new(Crawler::new(
            Arc::new(InMemorySources::new().with(sample_source())),
            Arc::new(InMemoryIndexStore::new()),
        ));
        let job = JobService::new(crawler, "demo");
        assert!(job.get_items("job-1").unwrap().is_empty());
        job.update_item("job-1", "item-1").unwrap();
        job.update_job("job-1").unwrap();
    }
}
