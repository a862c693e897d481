//! Domain-glob rate-limit rules
//!
//! A [`RateLimitRule`] is the `{glob, Delay, RandomDelay, Parallelism}` tuple
//! the Fetcher consults to decide pacing and concurrency for a request. Globs
//! are compiled once to a regex at rule-construction time to avoid repeated
//! compilation on the hot path.

use std::time::Duration;

use regex::Regex;

use crate::error::{CrawlCoreError, CrawlResult};

/// Convert a glob pattern (`*` matches any sequence) into an anchored regex.
pub fn compile_glob_pattern(pattern: &str) -> CrawlResult<Regex> {
    let regex_pattern = pattern.replace('*', ".*");
    let anchored = format!("^{regex_pattern}$");
    Regex::new(&anchored)
        .map_err(|e| CrawlCoreError::InvalidConfig(format!("invalid glob pattern '{pattern}': {e}")))
}

/// A single domain-glob pacing/concurrency rule.
#[derive(Debug, Clone)]
pub struct RateLimitRule {
    pub glob: String,
    pub delay: Duration,
    pub random_delay: Duration,
    pub parallelism: usize,
    matcher: Regex,
}

impl RateLimitRule {
    pub fn new(
        glob: impl Into<String>,
        delay: Duration,
        random_delay: Duration,
        parallelism: usize,
    ) -> CrawlResult<Self> {
        let glob = glob.into();
        let matcher = compile_glob_pattern(&glob)?;
        Ok(Self {
            glob,
            delay,
            random_delay,
            parallelism,
            matcher,
        })
    }

    /// The catch-all rule derived from a `SourceConfig`'s top-level
    /// `RateLimit`/`RandomDelay`/`Parallelism` fields.
    pub fn catch_all(
        delay: Duration,
        random_delay: Duration,
        parallelism: usize,
    ) -> CrawlResult<Self> {
        Self::new("*", delay, random_delay, parallelism)
    }

    #[must_use]
    pub fn matches(&self, host: &str) -> bool {
        self.matcher.is_match(host)
    }
}
