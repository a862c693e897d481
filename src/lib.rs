//! crawlcore: a configurable, single-process web-content crawling engine.
//!
//! A [`crawler::Crawler`] resolves a named [`sources::SourceConfig`], fetches
//! pages through a rate-limited [`fetch::Fetcher`], classifies and extracts
//! content, dispatches it through a [`processor::ProcessorRegistry`], and
//! reports lifecycle transitions on an [`events::EventBus`]. [`job::JobService`]
//! and [`supervisor::Supervisor`] wrap one crawl with the start/stop/status
//! surface a command-line entrypoint needs.

pub mod classify;
pub mod config;
pub mod crawler;
pub mod error;
pub mod events;
pub mod extract;
pub mod fetch;
pub mod frontier;
pub mod job;
pub mod model;
pub mod processor;
pub mod sources;
pub mod storage;
pub mod supervisor;

pub use classify::{classify, ContentType};
pub use config::{ArticleSelectors, SourceConfig, SourceConfigBuilder};
pub use crawler::Crawler;
pub use error::{CrawlCoreError, CrawlResult};
pub use events::{EventBus, Handler};
pub use extract::{extract_article, extract_page};
pub use fetch::{Fetcher, RateLimitRule};
pub use frontier::{EnqueueOutcome, Frontier};
pub use job::{JobService, JobStatus};
pub use model::{Article, Content, ContentTypeLabel, Page};
pub use processor::{Processor, ProcessorRegistry};
pub use sources::{InMemorySources, Sources, YamlSources};
pub use storage::{IndexStore, InMemoryIndexStore, StorageAdapter};
pub use supervisor::{SignalHandler, Supervisor, TokenSignalHandler};
