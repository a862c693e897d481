//! Error taxonomy for the crawl engine
//!
//! This module defines the discriminated error kinds raised by the core
//! components and the recovery semantics each kind implies: per-element
//! failures stay local (counted and published as an `Error` event) while
//! start-time and shutdown-time failures propagate to the caller.

/// Result alias used throughout the crate.
pub type CrawlResult<T> = Result<T, CrawlCoreError>;

/// Discriminated error kinds for the crawl engine.
///
/// Recoverable per-element errors (`InvalidUrl`, `MaxDepthReached`,
/// `ForbiddenDomain`, `RateLimitExceeded`, `ContentProcessingFailed`,
/// `ArticleProcessingFailed`) are logged and/or published as an `Error`
/// event and do not abort a run. `SourceNotFound`, `IndexNotFound`, and
/// `InvalidConfig` are fatal to the operation that raised them.
#[derive(Debug, thiserror::Error)]
pub enum CrawlCoreError {
    /// Source name unknown to the `Sources` provider.
    #[error("source not found: {0}")]
    SourceNotFound(String),

    /// Index for the source's `ArticleIndex`/`PageIndex` is missing.
    #[error("index not found: {0}")]
    IndexNotFound(String),

    /// Collector missing, bad rate-limit duration, or bad selectors.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// URL cannot be normalized or visited.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Backend rejected a request due to rate limiting.
    #[error("rate limit exceeded for {domain}")]
    RateLimitExceeded { domain: String },

    /// Frontier rejected an enqueue past the source's `MaxDepth`.
    #[error("max depth reached at {url} (depth {depth})")]
    MaxDepthReached { url: String, depth: u32 },

    /// URL falls outside the source's `AllowedDomains`.
    #[error("domain forbidden: {0}")]
    ForbiddenDomain(String),

    /// A registered processor returned an error.
    #[error("content processing failed: {0}")]
    ContentProcessingFailed(String),

    /// The article-specific processor failed.
    #[error("article processing failed: {0}")]
    ArticleProcessingFailed(String),

    /// Catch-all for ambient/boundary failures (I/O, transport setup).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CrawlCoreError {
    /// True for kinds the spec classifies as per-element (recoverable):
    /// the runtime logs/publishes and continues the run.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CrawlCoreError::InvalidUrl(_)
                | CrawlCoreError::MaxDepthReached { .. }
                | CrawlCoreError::ForbiddenDomain(_)
                | CrawlCoreError::RateLimitExceeded { .. }
                | CrawlCoreError::ContentProcessingFailed(_)
                | CrawlCoreError::ArticleProcessingFailed(_)
        )
    }
}
