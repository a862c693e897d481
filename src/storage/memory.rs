//! Reference `IndexStore`: an in-memory, `DashMap`-backed document store
//! used by default and by tests. Production deployments swap in a
//! different backend behind the same trait.

use dashmap::DashMap;

use crate::error::CrawlResult;

use super::IndexStore;

#[derive(Default)]
pub struct InMemoryIndexStore {
    indexes: DashMap<String, DashMap<String, serde_json::Value>>,
}

impl InMemoryIndexStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `index` present, even before any document is written to it.
    /// The default collector only checks `index_exists`, which otherwise
    /// answers `false` until the first document lands.
    pub fn create_index(&self, index: &str) {
        self.indexes.entry(index.to_string()).or_default();
    }
}

#[async_trait::async_trait]
impl IndexStore for InMemoryIndexStore {
    async fn index_exists(&self, name: &str) -> CrawlResult<bool> {
        Ok(self.indexes.contains_key(name))
    }

    async fn index_document(&self, index: &str, id: &str, doc: &serde_json::Value) -> CrawlResult<()> {
        self.indexes
            .entry(index.to_string())
            .or_default()
            .insert(id.to_string(), doc.clone());
        Ok(())
    }

    async fn get_document(&self, index: &str, id: &str) -> CrawlResult<Option<serde_json::Value>> {
        Ok(self
            .indexes
            .get(index)
            .and_then(|docs| docs.get(id).map(|d| d.clone())))
    }

    /// Naive `multi_match`-style scorer weighting `title` double over
    /// `body`/`description`, sufficient to satisfy `ListArticles`.
    async fn search(&self, index: &str, query: &serde_json::Value) -> CrawlResult<Vec<serde_json::Value>> {
        let Some(docs) = self.indexes.get(index) else {
            return Ok(Vec::new());
        };

        let needle = query
            .get("query")
            .and_then(|q| q.as_str())
            .unwrap_or_default()
            .to_lowercase();
        let size = query
            .get("size")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(100) as usize;

        if needle.is_empty() {
            return Ok(docs.iter().take(size).map(|e| e.value().clone()).collect());
        }

        let mut scored: Vec<(i64, serde_json::Value)> = docs
            .iter()
            .filter_map(|entry| {
                let doc = entry.value();
                let score = field_score(doc, "title", &needle) * 2
                    + field_score(doc, "body", &needle)
                    + field_score(doc, "description", &needle);
                (score > 0).then_some((score, doc.clone()))
            })
            .collect();

        scored.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(scored.into_iter().take(size).map(|(_, doc)| doc).collect())
    }
}

fn field_score(doc: &serde_json::Value, field: &str, needle: &str) -> i64 {
    doc.get(field)
        .and_then(serde_json::Value::as_str)
        .map(|text| i64::from(text.to_lowercase().contains(needle)))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn round_trips_a_document() {
        let store = InMemoryIndexStore::new();
        store.create_index("articles");
        assert!(store.index_exists("articles").await.unwrap());

        let doc = json!({"title": "Hello"});
        store.index_document("articles", "1", &doc).await.unwrap();
        assert_eq!(store.get_document("articles", "1").await.unwrap(), Some(doc));
    }

    #[tokio::test]
    async fn search_weights_title_over_body() {
        let store = InMemoryIndexStore::new();
        store
            .index_document("articles", "1", &json!({"title": "crawler", "body": "irrelevant"}))
            .await
            .unwrap();
        store
            .index_document("articles", "2", &json!({"title": "irrelevant", "body": "crawler crawler"}))
            .await
            .unwrap();

        let results = store
            .search("articles", &json!({"query": "crawler"}))
            .await
            .unwrap();
        assert_eq!(results[0]["title"], "crawler");
    }

    #[tokio::test]
    async fn missing_index_searches_empty() {
        let store = InMemoryIndexStore::new();
        let results = store.search("nope", &json!({"query": "x"})).await.unwrap();
        assert!(results.is_empty());
    }
}
