//! Processor Registry
//!
//! Maps a classified [`ContentType`] to the processor responsible for it,
//! dispatches extracted content to the right one, and counts content whose
//! type has no registered processor.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::RwLock;

use crate::classify::ContentType;
use crate::error::{CrawlCoreError, CrawlResult};
use crate::model::Content;

/// A consumer of classified content.
#[async_trait]
pub trait Processor: Send + Sync {
    fn content_type(&self) -> ContentType;

    /// Fallback capability check used when no processor is registered for
    /// the classified type.
    fn can_process(&self, _content: &Content) -> bool {
        false
    }

    async fn process(&self, content: &Content) -> CrawlResult<()>;
}

/// Registry mapping `ContentType -> Processor`, plus an ordered fallback
/// group consulted via `can_process`.
#[derive(Default)]
pub struct ProcessorRegistry {
    by_type: DashMap<ContentType, Arc<dyn Processor>>,
    fallback_group: RwLock<Vec<Arc<dyn Processor>>>,
    unknown_types: DashMap<ContentType, u64>,
}

impl ProcessorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `processor`, replacing any prior registration for the same
    /// content type, and append it to the fallback group.
    pub async fn register(&self, processor: Arc<dyn Processor>) {
        self.by_type.insert(processor.content_type(), processor.clone());
        self.fallback_group.write().await.push(processor);
    }

    /// Look up the processor registered for `content_type`.
    pub fn get(&self, content_type: ContentType) -> CrawlResult<Arc<dyn Processor>> {
        self.by_type
            .get(&content_type)
            .map(|p| p.clone())
            .ok_or_else(|| {
                CrawlCoreError::ContentProcessingFailed(format!(
                    "failed to get processor: no processor for {content_type:?}"
                ))
            })
    }

    /// Route `content` (classified as `content_type`) to a processor:
    /// the specific one if registered, otherwise the first fallback whose
    /// `can_process` returns true, otherwise increment the unknown-type
    /// counter and return `Ok(())`.
    pub async fn process(&self, content_type: ContentType, content: &Content) -> CrawlResult<()> {
        if let Ok(processor) = self.get(content_type) {
            return processor
                .process(content)
                .await
                .map_err(|e| CrawlCoreError::ContentProcessingFailed(format!("process failed: {e}")));
        }

        let fallback = self.fallback_group.read().await;
        for processor in fallback.iter() {
            if processor.can_process(content) {
                return processor
                    .process(content)
                    .await
                    .map_err(|e| CrawlCoreError::ContentProcessingFailed(format!("process failed: {e}")));
            }
        }

        *self.unknown_types.entry(content_type).or_insert(0) += 1;
        Ok(())
    }

    #[must_use]
    pub fn unknown_type_count(&self, content_type: ContentType) -> u64 {
        self.unknown_types.get(&content_type).map(|c| *c).unwrap_or(0)
    }
}

/// Simple atomic-counter processor used by tests and as a minimal article
/// sink when no richer processor is wired.
pub struct CountingProcessor {
    content_type: ContentType,
    count: AtomicU64,
}

impl CountingProcessor {
    #[must_use]
    pub fn new(content_type: ContentType) -> Self {
        Self {
            content_type,
            count: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Processor for CountingProcessor {
    fn content_type(&self) -> ContentType {
        self.content_type
    }

    async fn process(&self, _content: &Content) -> CrawlResult<()> {
        self.count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn content(content_type: ContentType) -> Content {
        Content {
            url: "https://x.test/".to_string(),
            content_type: content_type.into(),
            title: String::new(),
            description: String::new(),
            raw_content: String::new(),
            metadata: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn routes_to_the_specific_processor() {
        let registry = ProcessorRegistry::new();
        let processor = Arc::new(CountingProcessor::new(ContentType::Article));
        registry.register(processor.clone()).await;

        registry.process(ContentType::Article, &content(ContentType::Article)).await.unwrap();
        assert_eq!(processor.count(), 1);
    }

    #[tokio::test]
    async fn unregistered_type_increments_unknown_counter() {
        let registry = ProcessorRegistry::new();
        registry.process(ContentType::Video, &content(ContentType::Video)).await.unwrap();
        assert_eq!(registry.unknown_type_count(ContentType::Video), 1);
    }

    #[tokio::test]
    async fn duplicate_registration_replaces_prior_one() {
        let registry = ProcessorRegistry::new();
        let first = Arc::new(CountingProcessor::new(ContentType::Page));
        let second = Arc::new(CountingProcessor::new(ContentType::Page));
        registry.register(first.clone()).await;
        registry.register(second.clone()).await;

        registry.process(ContentType::Page, &content(ContentType::Page)).await.unwrap();
        assert_eq!(first.count(), 0);
        assert_eq!(second.count(), 1);
    }
}
