//! Builder methods available for all states
//!
//! This module contains methods that can be called on the builder
//! regardless of its current type state.

use std::time::Duration;

use super::builder::SourceConfigBuilder;
use super::types::ArticleSelectors;

// Methods available for all states
impl<State> SourceConfigBuilder<State> {
    #[must_use]
    pub fn allowed_domains(
        mut self,
        domains: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.allowed_domains = domains.into_iter().map(Into::into).collect();
        self
    }

    /// Maximum link-following depth from the seed URL, inclusive.
    #[must_use]
    pub fn max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    /// Minimum delay enforced between consecutive requests to the same domain glob.
    #[must_use]
    pub fn rate_limit(mut self, delay: Duration) -> Self {
        self.rate_limit = delay;
        self
    }

    /// Additional uniform-random jitter added on top of `rate_limit`.
    #[must_use]
    pub fn random_delay(mut self, delay: Duration) -> Self {
        self.random_delay = delay;
        self
    }

    /// Maximum number of concurrent in-flight requests per domain glob.
    #[must_use]
    pub fn parallelism(mut self, n: usize) -> Self {
        self.parallelism = n;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }

    #[must_use]
    pub fn article_index(mut self, index: impl Into<String>) -> Self {
        self.article_index = index.into();
        self
    }

    #[must_use]
    pub fn page_index(mut self, index: impl Into<String>) -> Self {
        self.page_index = index.into();
        self
    }

    #[must_use]
    pub fn selectors(mut self, selectors: ArticleSelectors) -> Self {
        self.selectors = selectors;
        self
    }
}
