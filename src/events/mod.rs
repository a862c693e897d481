//! Event Bus
//!
//! In-process publish/subscribe with four event verbs: Article, Error,
//! Start, Stop. `Subscribe` appends to an ordered handler list; `Publish*`
//! snapshots the list under a read lock and invokes each handler
//! sequentially, in subscription order, outside the lock. A handler's
//! error is logged and never aborts the publish. No backpressure: handlers
//! are synchronous.

use std::sync::{Arc, RwLock};

use tokio_util::sync::CancellationToken;

use crate::error::CrawlResult;
use crate::model::Article;

/// A subscriber to crawler events. Every method defaults to a no-op so a
/// handler only needs to implement the verbs it cares about.
pub trait Handler: Send + Sync {
    fn handle_article(&self, _article: &Article) -> CrawlResult<()> {
        Ok(())
    }

    fn handle_error(&self, _source: &str, _message: &str) -> CrawlResult<()> {
        Ok(())
    }

    fn handle_start(&self, _source: &str) -> CrawlResult<()> {
        Ok(())
    }

    fn handle_stop(&self, _source: &str) -> CrawlResult<()> {
        Ok(())
    }
}

/// Ordered, synchronous fan-out of crawler events to registered handlers.
#[derive(Default)]
pub struct EventBus {
    handlers: RwLock<Vec<Arc<dyn Handler>>>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `handler` to the ordered subscriber list.
    pub fn subscribe(&self, handler: Arc<dyn Handler>) {
        self.handlers.write().expect("event bus lock poisoned").push(handler);
    }

    pub fn publish_article(&self, cancel: &CancellationToken, article: &Article) {
        self.publish(cancel, |h| h.handle_article(article));
    }

    pub fn publish_error(&self, cancel: &CancellationToken, source: &str, message: &str) {
        self.publish(cancel, |h| h.handle_error(source, message));
    }

    pub fn publish_start(&self, cancel: &CancellationToken, source: &str) {
        self.publish(cancel, |h| h.handle_start(source));
    }

    pub fn publish_stop(&self, cancel: &CancellationToken, source: &str) {
        self.publish(cancel, |h| h.handle_stop(source));
    }

    fn publish(&self, cancel: &CancellationToken, invoke: impl Fn(&Arc<dyn Handler>) -> CrawlResult<()>) {
        if cancel.is_cancelled() {
            return;
        }

        let snapshot: Vec<Arc<dyn Handler>> = self
            .handlers
            .read()
            .expect("event bus lock poisoned")
            .clone();

        for handler in &snapshot {
            if let Err(e) = invoke(handler) {
                tracing::warn!(error = %e, "event handler failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct Recorder {
        order: Arc<Mutex<Vec<usize>>>,
        id: usize,
    }

    impl Handler for Recorder {
        fn handle_article(&self, _article: &Article) -> CrawlResult<()> {
            self.order.lock().unwrap().push(self.id);
            Ok(())
        }
    }

    fn sample_article() -> Article {
        Article {
            id: uuid::Uuid::new_v4(),
            title: "t".to_string(),
            body: "b".to_string(),
            author: String::new(),
            byline_name: String::new(),
            published_date: chrono::DateTime::<chrono::Utc>::from_timestamp(0, 0).unwrap(),
            source: "https://x.test".to_string(),
            tags: vec![],
            intro: String::new(),
            description: String::new(),
            og_title: String::new(),
            og_description: String::new(),
            og_image: String::new(),
            og_url: String::new(),
            canonical_url: String::new(),
            word_count: 0,
            category: String::new(),
            section: String::new(),
            keywords: String::new(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn handlers_fire_in_subscription_order() {
        let bus = EventBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(Arc::new(Recorder { order: order.clone(), id: 1 }));
        bus.subscribe(Arc::new(Recorder { order: order.clone(), id: 2 }));

        bus.publish_article(&CancellationToken::new(), &sample_article());

        assert_eq!(*order.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn cancelled_token_skips_publish() {
        let bus = EventBus::new();
        let calls = Arc::new(AtomicUsize::new(0));
        struct Counter(Arc<AtomicUsize>);
        impl Handler for Counter {
            fn handle_article(&self, _article: &Article) -> CrawlResult<()> {
                self.0.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }
        bus.subscribe(Arc::new(Counter(calls.clone())));

        let cancel = CancellationToken::new();
        cancel.cancel();
        bus.publish_article(&cancel, &sample_article());

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn a_failing_handler_does_not_block_the_rest() {
        struct Failing;
        impl Handler for Failing {
            fn handle_article(&self, _article: &Article) -> CrawlResult<()> {
                Err(crate::error::CrawlCoreError::Other(anyhow::anyhow!("boom")))
            }
        }
        let bus = EventBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(Arc::new(Failing));
        bus.subscribe(Arc::new(Recorder { order: order.clone(), id: 1 }));

        bus.publish_article(&CancellationToken::new(), &sample_article());

        assert_eq!(*order.lock().unwrap(), vec![1]);
    }
}
