//! Crawler Runtime & State Machine
//!
//! Owns the Fetcher, Frontier, Processor Registry, and Event Bus for one
//! active run; exposes `Start`/`Stop`/`Wait`/`Subscribe`/`SetRateLimit`/
//! `SetMaxDepth`/`GetMetrics`. States: idle -> starting -> running ->
//! stopping -> idle. `Stop` is idempotent and always leaves the runtime
//! idle, even if the stop timeout elapses.

mod defaults;
mod state;

pub use defaults::{
    ARTICLE_CHANNEL_BUFFER_SIZE, DEFAULT_FLUSH_INTERVAL, DEFAULT_INIT_TIMEOUT, DEFAULT_POLL_INTERVAL,
    DEFAULT_REQUEST_TIMEOUT, DEFAULT_START_TIMEOUT, DEFAULT_STOP_TIMEOUT,
};
pub use state::{CrawlerState, MetricsSnapshot};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use scraper::{Html, Selector};
use tokio::sync::{mpsc, watch, RwLock};
use tokio_util::sync::CancellationToken;

use crate::classify::{classify, ContentType};
use crate::config::SourceConfig;
use crate::error::{CrawlCoreError, CrawlResult};
use crate::events::{EventBus, Handler};
use crate::extract::{extract_article, extract_page};
use crate::fetch::{Fetcher, RateLimitRule};
use crate::frontier::{EnqueueOutcome, Frontier};
use crate::model::{Article, Content};
use crate::processor::{Processor, ProcessorRegistry};
use crate::sources::Sources;
use crate::storage::{IndexStore, StorageAdapter};

/// A discovered link queued for visitation, resolved against the page it
/// was found on.
struct LinkMessage {
    url: String,
    base: String,
    depth: u32,
}

/// State that exists only while a crawl is active; torn down on `Stop`.
///
/// `done` flips to `true` exactly once, when the management loop has fully
/// drained (naturally or via cancellation); a fresh `watch::Receiver` clone
/// always observes the latest value, so there is no lost-wakeup window
/// between checking it and awaiting a change.
struct RunHandle {
    cancel: CancellationToken,
    fetcher: Arc<Fetcher>,
    done: watch::Receiver<bool>,
}

/// Owns a single active (or idle) crawl of one named source at a time.
pub struct Crawler {
    sources: Arc<dyn Sources>,
    store: Arc<dyn IndexStore>,
    registry: Arc<ProcessorRegistry>,
    bus: Arc<EventBus>,
    state: Arc<CrawlerState>,
    run: RwLock<Option<RunHandle>>,
}

impl Crawler {
    #[must_use]
    pub fn new(sources: Arc<dyn Sources>, store: Arc<dyn IndexStore>) -> Self {
        Self {
            sources,
            store,
            registry: Arc::new(ProcessorRegistry::new()),
            bus: Arc::new(EventBus::new()),
            state: Arc::new(CrawlerState::new()),
            run: RwLock::new(None),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<ProcessorRegistry> {
        &self.registry
    }

    pub async fn register_processor(&self, processor: Arc<dyn Processor>) {
        self.registry.register(processor).await;
    }

    /// Append `handler` to the Event Bus's ordered subscriber list.
    pub fn subscribe(&self, handler: Arc<dyn Handler>) {
        self.bus.subscribe(handler);
    }

    #[must_use]
    pub fn metrics(&self) -> MetricsSnapshot {
        self.state.snapshot()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Replace the active run's catch-all rate-limit rule. Requires a run
    /// in progress (`Start` builds the Fetcher); otherwise `InvalidConfig`.
    pub async fn set_rate_limit(&self, delay: std::time::Duration, random_delay: std::time::Duration, parallelism: usize) -> CrawlResult<()> {
        let run = self.run.read().await;
        let handle = run
            .as_ref()
            .ok_or_else(|| CrawlCoreError::InvalidConfig("collector missing".to_string()))?;
        handle
            .fetcher
            .limit(RateLimitRule::catch_all(delay, random_delay, parallelism)?);
        Ok(())
    }

    pub async fn set_max_depth(&self, depth: u32) -> CrawlResult<()> {
        let run = self.run.read().await;
        let handle = run
            .as_ref()
            .ok_or_else(|| CrawlCoreError::InvalidConfig("collector missing".to_string()))?;
        handle.fetcher.set_max_depth(depth);
        Ok(())
    }

    /// Resolve `source_name`, confirm its article index exists, build the
    /// Fetcher and Frontier, and spawn the management loop.
    pub async fn start(&self, source_name: &str) -> CrawlResult<()> {
        let source = self
            .sources
            .get(source_name)
            .ok_or_else(|| CrawlCoreError::SourceNotFound(source_name.to_string()))?;

        if !self
            .store
            .index_exists(source.article_index())
            .await
            .map_err(|e| CrawlCoreError::Other(anyhow::anyhow!(e)))?
        {
            return Err(CrawlCoreError::IndexNotFound(source.article_index().to_string()));
        }

        let fetcher = Arc::new(Fetcher::new(source.user_agent(), DEFAULT_REQUEST_TIMEOUT)?);
        fetcher.set_max_depth(source.max_depth());
        fetcher.limit(RateLimitRule::catch_all(
            source.rate_limit(),
            source.random_delay(),
            source.parallelism(),
        )?);

        let frontier = Arc::new(Frontier::new());
        let cancel = CancellationToken::new();
        let (done_tx, done_rx) = watch::channel(false);

        {
            let mut run = self.run.write().await;
            *run = Some(RunHandle {
                cancel: cancel.clone(),
                fetcher: fetcher.clone(),
                done: done_rx,
            });
        }

        self.state.start(source.name());
        self.bus.publish_start(&cancel, source.name());

        let ctx = RunContext {
            source: Arc::new(source),
            fetcher,
            frontier,
            registry: self.registry.clone(),
            bus: self.bus.clone(),
            storage: Arc::new(StorageAdapter::new(self.store.clone())),
            state: self.state.clone(),
            cancel: cancel.clone(),
        };

        tokio::spawn(run_management_loop(ctx, done_tx));

        Ok(())
    }

    /// Cancel the active run, wait up to `DefaultStopTimeout` for it to
    /// drain, then return the runtime to idle. Idempotent: calling `stop`
    /// when already idle returns `Ok(())` immediately.
    pub async fn stop(&self) -> CrawlResult<()> {
        if !self.state.is_running() {
            return Ok(());
        }

        let handle = self.run.write().await.take();
        let Some(mut handle) = handle else {
            self.state.stop();
            return Ok(());
        };

        handle.cancel.cancel();

        let source = self.state.current_source().unwrap_or_default();
        let drained = tokio::time::timeout(DEFAULT_STOP_TIMEOUT, async {
            if !*handle.done.borrow() {
                let _ = handle.done.changed().await;
            }
        })
        .await;
        if drained.is_err() {
            tracing::warn!(source = %source, "failed to stop crawler gracefully");
        }

        self.bus.publish_stop(&CancellationToken::new(), &source);
        self.state.stop();
        Ok(())
    }

    /// Block until the active run's management loop has finished (all
    /// in-flight fetches and their handlers completed).
    pub async fn wait(&self) {
        let handle = {
            let run = self.run.read().await;
            run.as_ref().map(|h| (h.done.clone(), h.fetcher.clone()))
        };
        if let Some((mut done, fetcher)) = handle {
            fetcher.wait().await;
            if !*done.borrow() {
                let _ = done.changed().await;
            }
        }
    }
}

/// Immutable handles shared by every task spawned by one run.
#[derive(Clone)]
struct RunContext {
    source: Arc<SourceConfig>,
    fetcher: Arc<Fetcher>,
    frontier: Arc<Frontier>,
    registry: Arc<ProcessorRegistry>,
    bus: Arc<EventBus>,
    storage: Arc<StorageAdapter>,
    state: Arc<CrawlerState>,
    cancel: CancellationToken,
}

async fn run_management_loop(ctx: RunContext, done: watch::Sender<bool>) {
    let (link_tx, mut link_rx) = mpsc::unbounded_channel::<LinkMessage>();
    let (article_tx, mut article_rx) = mpsc::channel::<Article>(ARTICLE_CHANNEL_BUFFER_SIZE);
    let outstanding = Arc::new(AtomicUsize::new(1));

    link_tx
        .send(LinkMessage {
            url: ctx.source.url().to_string(),
            base: ctx.source.url().to_string(),
            depth: 0,
        })
        .ok();

    let article_sink = {
        let storage = ctx.storage.clone();
        let bus = ctx.bus.clone();
        let cancel = ctx.cancel.clone();
        let article_index = ctx.source.article_index().to_string();
        tokio::spawn(async move {
            while let Some(article) = article_rx.recv().await {
                bus.publish_article(&cancel, &article);
                if let Err(e) = storage.save_article(&article_index, &article).await {
                    tracing::warn!(error = %e, "failed to save article");
                }
            }
        })
    };

    loop {
        if ctx.cancel.is_cancelled() || outstanding.load(Ordering::SeqCst) == 0 {
            break;
        }

        // DefaultPollInterval bounds how long a natural-completion check can
        // lag once the last outstanding item finishes without discovering a
        // new link.
        let msg = tokio::select! {
            biased;
            () = ctx.cancel.cancelled() => break,
            received = link_rx.recv() => match received {
                Some(msg) => msg,
                None => break,
            },
            () = tokio::time::sleep(DEFAULT_POLL_INTERVAL) => continue,
        };

        let outcome = ctx.frontier.enqueue(
            &msg.url,
            &msg.base,
            msg.depth,
            ctx.source.allowed_domains(),
            ctx.source.max_depth(),
        );

        match outcome {
            EnqueueOutcome::Enqueued { depth } => {
                let ctx = ctx.clone();
                let link_tx = link_tx.clone();
                let article_tx = article_tx.clone();
                let outstanding = outstanding.clone();
                tokio::spawn(async move {
                    visit_and_dispatch(ctx, msg.url, depth, link_tx, article_tx, outstanding.clone()).await;
                    outstanding.fetch_sub(1, Ordering::SeqCst);
                });
            }
            EnqueueOutcome::InvalidUrl(url) => {
                ctx.bus.publish_error(&CancellationToken::new(), ctx.source.name(), &format!("invalid url: {url}"));
                outstanding.fetch_sub(1, Ordering::SeqCst);
            }
            EnqueueOutcome::AlreadyVisited
            | EnqueueOutcome::ForbiddenDomain
            | EnqueueOutcome::MaxDepthReached
            | EnqueueOutcome::Skipped => {
                tracing::debug!(url = %msg.url, outcome = ?outcome, "skipping url");
                outstanding.fetch_sub(1, Ordering::SeqCst);
            }
        }
    }

    ctx.fetcher.wait().await;
    drop(article_tx);
    drop(link_tx);
    let _ = article_sink.await;

    // Natural completion (the link queue drained with nothing outstanding)
    // also returns the runtime to idle; `Crawler::stop` is then a no-op.
    if ctx.state.is_running() {
        ctx.state.stop();
        ctx.bus.publish_stop(&CancellationToken::new(), ctx.source.name());
    }
    let _ = done.send(true);
}

async fn visit_and_dispatch(
    ctx: RunContext,
    url: String,
    depth: u32,
    link_tx: mpsc::UnboundedSender<LinkMessage>,
    article_tx: mpsc::Sender<Article>,
    outstanding: Arc<AtomicUsize>,
) {
    let fetched = match ctx.fetcher.visit(&url).await {
        Ok(page) => page,
        Err(e) => {
            ctx.state.record_error();
            ctx.bus.publish_error(&CancellationToken::new(), ctx.source.name(), &e.to_string());
            return;
        }
    };

    enum Prepared {
        Article(Article, Content),
        Other(Content),
    }

    let prepared = {
        let dom = Html::parse_document(&fetched.body);
        let content_type = classify(&url, &fetched.headers, &dom);
        ctx.state.record_processed();

        for href in discover_links(&dom) {
            outstanding.fetch_add(1, Ordering::SeqCst);
            let _ = link_tx.send(LinkMessage {
                url: href,
                base: url.clone(),
                depth: depth + 1,
            });
        }

        match content_type {
            ContentType::Article => {
                let Some(article) = extract_article(&dom, ctx.source.selectors(), &url) else {
                    return;
                };

                let content = Content {
                    url: url.clone(),
                    content_type: content_type.into(),
                    title: article.title.clone(),
                    description: article.description.clone(),
                    raw_content: article.body.clone(),
                    metadata: std::collections::HashMap::new(),
                };
                (content_type, Prepared::Article(article, content))
            }
            _ => {
                let page = extract_page(&dom, &url, content_type);
                let content = Content {
                    url: url.clone(),
                    content_type: content_type.into(),
                    title: page.title,
                    description: String::new(),
                    raw_content: page.body,
                    metadata: std::collections::HashMap::new(),
                };
                (content_type, Prepared::Other(content))
            }
        }
    };

    let (content_type, prepared) = prepared;
    match prepared {
        Prepared::Article(article, content) => {
            if let Err(e) = ctx.registry.process(content_type, &content).await {
                ctx.state.record_error();
                ctx.bus.publish_error(&CancellationToken::new(), ctx.source.name(), &e.to_string());
            }

            if let Err(mpsc::error::TrySendError::Full(_)) = article_tx.try_send(article) {
                ctx.state.record_error();
                tracing::warn!(url = %url, "channel full, dropping article");
            }
        }
        Prepared::Other(content) => {
            if let Err(e) = ctx.registry.process(content_type, &content).await {
                ctx.state.record_error();
                ctx.bus.publish_error(&CancellationToken::new(), ctx.source.name(), &e.to_string());
            }
        }
    }
}

fn discover_links(dom: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    dom.select(&selector)
        .filter_map(|el| el.value().attr("href"))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::InMemorySources;
    use crate::storage::InMemoryIndexStore;
    use std::time::Duration;

    fn sample_source() -> SourceConfig {
        SourceConfig::builder()
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
    async fn start_fails_for_unknown_source() {
        let crawler = Crawler::new(Arc::new(InMemorySources::new()), Arc::new(InMemoryIndexStore::new()));
        let err = crawler.start("missing").await.unwrap_err();
        assert!(matches!(err, CrawlCoreError::SourceNotFound(_)));
    }

    #[tokio::test]
    async fn start_fails_when_index_is_missing() {
        let sources = InMemorySources::new().with(sample_source());
        let crawler = Crawler::new(Arc::new(sources), Arc::new(InMemoryIndexStore::new()));
        let err = crawler.start("demo").await.unwrap_err();
        assert!(matches!(err, CrawlCoreError::IndexNotFound(_)));
    }

    #[tokio::test]
    async fn stop_before_start_is_a_harmless_noop() {
        let crawler = Crawler::new(Arc::new(InMemorySources::new()), Arc::new(InMemoryIndexStore::new()));
        crawler.stop().await.unwrap();
        crawler.stop().await.unwrap();
        assert!(!crawler.is_running());
    }

    #[tokio::test]
    async fn set_rate_limit_without_a_run_is_invalid_config() {
        let crawler = Crawler::new(Arc::new(InMemorySources::new()), Arc::new(InMemoryIndexStore::new()));
        let err = crawler
            .set_rate_limit(Duration::ZERO, Duration::ZERO, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, CrawlCoreError::InvalidConfig(_)));
    }
}
