//! Source configuration for the crawl engine
//!
//! This module provides the `SourceConfig` and `ArticleSelectors` types
//! that describe a single named crawl target: its seed URL, crawl policy,
//! and per-source selector set used by the extractors.

use std::time::Duration;

/// Per-source CSS/attribute selectors consumed by the article extractor.
///
/// Every field is optional; an absent field falls back to Open-Graph meta,
/// then JSON-LD, then a documented default (see `extract::article`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleSelectors {
    pub container: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub intro: Option<String>,
    pub byline: Option<String>,
    pub author: Option<String>,
    pub published_time: Option<String>,
    pub time_ago: Option<String>,
    pub json_ld: Option<String>,
    pub section: Option<String>,
    pub keywords: Option<String>,
    pub description: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    pub og_url: Option<String>,
    pub canonical: Option<String>,
    pub word_count: Option<String>,
    pub exclude: Vec<String>,
    pub tags: Option<String>,
}

/// Immutable crawl policy for one named source.
///
/// Constructed via [`SourceConfig::builder`] and never mutated after a
/// [`crate::crawler::Crawler`] has resolved it for a run.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub(crate) name: String,
    pub(crate) url: String,
    pub(crate) allowed_domains: Vec<String>,
    pub(crate) max_depth: u32,
    pub(crate) rate_limit: Duration,
    pub(crate) random_delay: Duration,
    pub(crate) parallelism: usize,
    pub(crate) user_agent: String,
    pub(crate) article_index: String,
    pub(crate) page_index: String,
    pub(crate) selectors: ArticleSelectors,
}
