//! Getter methods for `SourceConfig`
//!
//! This module provides all the accessor methods for retrieving configuration
//! values from a `SourceConfig` instance.

use std::time::Duration;

use super::types::{ArticleSelectors, SourceConfig};

impl SourceConfig {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn allowed_domains(&self) -> &[String] {
        &self.allowed_domains
    }

    #[must_use]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    #[must_use]
    pub fn rate_limit(&self) -> Duration {
        self.rate_limit
    }

    #[must_use]
    pub fn random_delay(&self) -> Duration {
        self.random_delay
    }

    #[must_use]
    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    #[must_use]
    pub fn article_index(&self) -> &str {
        &self.article_index
    }

    #[must_use]
    pub fn page_index(&self) -> &str {
        &self.page_index
    }

    #[must_use]
    pub fn selectors(&self) -> &ArticleSelectors {
        &self.selectors
    }

    /// True when `AllowedDomains` is empty, meaning every domain passes the filter.
    #[must_use]
    pub fn allows_all_domains(&self) -> bool {
        self.allowed_domains.is_empty()
    }

    /// Domain-membership check used by the Frontier's visitation policy.
    #[must_use]
    pub fn domain_allowed(&self, host: &str) -> bool {
        self.allowed_domains.is_empty()
            || self
                .allowed_domains
                .iter()
                .any(|allowed| host == allowed || host.ends_with(&format!(".{allowed}")))
    }
}
