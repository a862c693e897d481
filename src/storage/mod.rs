//! Article / Page Storage Adapter
//!
//! A thin wrapper over an opaque external Index Store backend, reached
//! through the [`IndexStore`] trait. The wire format of documents is not
//! owned by this crate — documents are opaque JSON-serializable records
//! keyed by the `Article`'s UUID.

mod adapter;
mod memory;

pub use adapter::StorageAdapter;
pub use memory::InMemoryIndexStore;

use async_trait::async_trait;

use crate::error::CrawlResult;

/// Opaque document-store backend consumed by the core.
#[async_trait]
pub trait IndexStore: Send + Sync {
    async fn index_exists(&self, name: &str) -> CrawlResult<bool>;
    async fn index_document(&self, index: &str, id: &str, doc: &serde_json::Value) -> CrawlResult<()>;
    async fn get_document(&self, index: &str, id: &str) -> CrawlResult<Option<serde_json::Value>>;
    async fn search(&self, index: &str, query: &serde_json::Value) -> CrawlResult<Vec<serde_json::Value>>;
}
