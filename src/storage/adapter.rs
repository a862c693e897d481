//! Thin storage adapter translating `Article` operations into `IndexStore`
//! calls under a source-specific index.

use std::sync::Arc;

use serde_json::json;

use crate::error::{CrawlCoreError, CrawlResult};
use crate::model::Article;

use super::IndexStore;

const DEFAULT_BUFFER_SIZE: u64 = 100;

pub struct StorageAdapter {
    store: Arc<dyn IndexStore>,
}

impl StorageAdapter {
    #[must_use]
    pub fn new(store: Arc<dyn IndexStore>) -> Self {
        Self { store }
    }

    /// Persist `article` under `index`. Rejects nothing at this layer
    /// beyond what the type system already guarantees (an `&Article` is
    /// never absent); all errors are wrapped with operation context.
    pub async fn save_article(&self, index: &str, article: &Article) -> CrawlResult<()> {
        let doc = serde_json::to_value(article)
            .map_err(|e| CrawlCoreError::Other(anyhow::anyhow!("failed to serialize article: {e}")))?;
        self.store
            .index_document(index, &article.id.to_string(), &doc)
            .await
            .map_err(|e| CrawlCoreError::Other(anyhow::anyhow!("save_article failed: {e}")))
    }

    pub async fn get_article(&self, index: &str, id: &str) -> CrawlResult<Option<Article>> {
        let Some(doc) = self
            .store
            .get_document(index, id)
            .await
            .map_err(|e| CrawlCoreError::Other(anyhow::anyhow!("get_article failed: {e}")))?
        else {
            return Ok(None);
        };

        serde_json::from_value(doc)
            .map(Some)
            .map_err(|e| CrawlCoreError::Other(anyhow::anyhow!("failed to deserialize article: {e}")))
    }

    /// `multi_match`-style lookup over `title^2, body, description`, sized
    /// at `DefaultBufferSize`.
    pub async fn list_articles(&self, index: &str, query: &str) -> CrawlResult<Vec<Article>> {
        let results = self
            .store
            .search(index, &json!({"query": query, "size": DEFAULT_BUFFER_SIZE}))
            .await
            .map_err(|e| CrawlCoreError::Other(anyhow::anyhow!("list_articles failed: {e}")))?;

        results
            .into_iter()
            .map(|doc| {
                serde_json::from_value(doc).map_err(|e| {
                    CrawlCoreError::Other(anyhow::anyhow!("failed to deserialize article: {e}"))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::InMemoryIndexStore;
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_article(title: &str) -> Article {
        Article {
            id: Uuid::new_v4(),
            title: title.to_string(),
            body: "body".to_string(),
            author: String::new(),
            byline_name: String::new(),
            published_date: Utc::now(),
            source: "https://x.test".to_string(),
            tags: vec![],
            intro: String::new(),
            description: String::new(),
            og_title: String::new(),
            og_description: String::new(),
            og_image: String::new(),
            og_url: String::new(),
            canonical_url: String::new(),
            word_count: 2,
            category: String::new(),
            section: String::new(),
            keywords: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn save_then_get_round_trips() {
        let adapter = StorageAdapter::new(Arc::new(InMemoryIndexStore::new()));
        let article = sample_article("Hello");
        adapter.save_article("articles", &article).await.unwrap();

        let fetched = adapter
            .get_article("articles", &article.id.to_string())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.title, "Hello");
    }

    #[tokio::test]
    async fn list_articles_finds_by_title() {
        let adapter = StorageAdapter::new(Arc::new(InMemoryIndexStore::new()));
        adapter.save_article("articles", &sample_article("Rust Crawler")).await.unwrap();
        adapter.save_article("articles", &sample_article("Unrelated")).await.unwrap();

        let found = adapter.list_articles("articles", "crawler").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Rust Crawler");
    }
}
