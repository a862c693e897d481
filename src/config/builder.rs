//! Type-safe builder for `SourceConfig` using the typestate pattern
//!
//! This module provides a fluent builder interface with compile-time validation
//! ensuring that required fields are set before building a `SourceConfig`.

use std::marker::PhantomData;
use std::time::Duration;

use crate::error::{CrawlCoreError, CrawlResult};

use super::types::{ArticleSelectors, SourceConfig};

const DEFAULT_USER_AGENT: &str = concat!("crawlcore/", env!("CARGO_PKG_VERSION"));

// Type states for the builder
pub struct WithName;
pub struct WithUrl;
pub struct Complete;

pub struct SourceConfigBuilder<State = ()> {
    pub(crate) name: Option<String>,
    pub(crate) url: Option<String>,
    pub(crate) allowed_domains: Vec<String>,
    pub(crate) max_depth: u32,
    pub(crate) rate_limit: Duration,
    pub(crate) random_delay: Duration,
    pub(crate) parallelism: usize,
    pub(crate) user_agent: String,
    pub(crate) article_index: String,
    pub(crate) page_index: String,
    pub(crate) selectors: ArticleSelectors,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for SourceConfigBuilder<()> {
    fn default() -> Self {
        Self {
            name: None,
            url: None,
            allowed_domains: Vec::new(),
            max_depth: 2,
            rate_limit: Duration::ZERO,
            random_delay: Duration::ZERO,
            parallelism: 1,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            article_index: String::new(),
            page_index: String::new(),
            selectors: ArticleSelectors::default(),
            _phantom: PhantomData,
        }
    }
}

impl SourceConfig {
    /// Create a builder for configuring a `SourceConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> SourceConfigBuilder<()> {
        SourceConfigBuilder::default()
    }
}

impl SourceConfigBuilder<()> {
    pub fn name(self, name: impl Into<String>) -> SourceConfigBuilder<WithName> {
        SourceConfigBuilder {
            name: Some(name.into()),
            url: self.url,
            allowed_domains: self.allowed_domains,
            max_depth: self.max_depth,
            rate_limit: self.rate_limit,
            random_delay: self.random_delay,
            parallelism: self.parallelism,
            user_agent: self.user_agent,
            article_index: self.article_index,
            page_index: self.page_index,
            selectors: self.selectors,
            _phantom: PhantomData,
        }
    }
}

impl SourceConfigBuilder<WithName> {
    pub fn url(self, url: impl Into<String>) -> SourceConfigBuilder<WithUrl> {
        SourceConfigBuilder {
            name: self.name,
            url: Some(url.into()),
            allowed_domains: self.allowed_domains,
            max_depth: self.max_depth,
            rate_limit: self.rate_limit,
            random_delay: self.random_delay,
            parallelism: self.parallelism,
            user_agent: self.user_agent,
            article_index: self.article_index,
            page_index: self.page_index,
            selectors: self.selectors,
            _phantom: PhantomData,
        }
    }
}

// Build method only available when all required fields are set
impl SourceConfigBuilder<WithUrl> {
    pub fn build(self) -> CrawlResult<SourceConfig> {
        let name = self
            .name
            .ok_or_else(|| CrawlCoreError::InvalidConfig("name is required".into()))?;
        let url = self
            .url
            .ok_or_else(|| CrawlCoreError::InvalidConfig("url is required".into()))?;

        if name.is_empty() {
            return Err(CrawlCoreError::InvalidConfig(
                "name must not be empty".into(),
            ));
        }
        if self.parallelism == 0 {
            return Err(CrawlCoreError::InvalidConfig(
                "parallelism must be at least 1".into(),
            ));
        }

        Ok(SourceConfig {
            name,
            url,
            allowed_domains: self.allowed_domains,
            max_depth: self.max_depth,
            rate_limit: self.rate_limit,
            random_delay: self.random_delay,
            parallelism: self.parallelism,
            user_agent: self.user_agent,
            article_index: self.article_index,
            page_index: self.page_index,
            selectors: self.selectors,
        })
    }
}
