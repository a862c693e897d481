//! URL Frontier & Visitation Policy
//!
//! Decides, for every URL extracted from a fetched page, whether to visit it
//! and at what depth. The frontier only enforces the depth bound; the
//! Fetcher's per-domain scheduler determines actual fetch order, so
//! visitation here is breadth-aware but not strictly breadth-first.

use dashmap::{DashMap, DashSet};
use url::Url;

/// Discriminated outcome of [`Frontier::enqueue`].
///
/// "Already visited", "forbidden domain", "max depth", and "skipped" (empty
/// or ignored-scheme href such as `mailto:`/`tel:`/`javascript:`/`#...`) are
/// silent at design level — the runtime logs them at debug and moves on.
/// Only `InvalidUrl` — a URL that fails normalization outright — is
/// surfaced as an error event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnqueueOutcome {
    Enqueued { depth: u32 },
    AlreadyVisited,
    ForbiddenDomain,
    MaxDepthReached,
    Skipped,
    InvalidUrl(String),
}

/// Tracks visited URLs, their depth, and decides visit-vs-skip.
///
/// The visited set is a single `DashSet`, whose internal sharding gives the
/// O(1)-membership, single-lock contract the concurrency model asks for.
pub struct Frontier {
    visited: DashSet<String>,
    depths: DashMap<String, u32>,
}

impl Default for Frontier {
    fn default() -> Self {
        Self::new()
    }
}

impl Frontier {
    #[must_use]
    pub fn new() -> Self {
        Self {
            visited: DashSet::new(),
            depths: DashMap::new(),
        }
    }

    /// Normalize `url` against `base`, then decide whether to enqueue it at
    /// `depth`. Marks the URL visited on success so no run ever fetches the
    /// same normalized URL twice (property 1).
    pub fn enqueue(
        &self,
        url: &str,
        base: &str,
        depth: u32,
        allowed_domains: &[String],
        max_depth: u32,
    ) -> EnqueueOutcome {
        let Some(normalized) = normalize(url, base) else {
            return EnqueueOutcome::InvalidUrl(url.to_string());
        };

        if is_ignored_scheme(&normalized) {
            return EnqueueOutcome::Skipped;
        }

        let Ok(parsed) = Url::parse(&normalized) else {
            return EnqueueOutcome::InvalidUrl(url.to_string());
        };
        let Some(host) = parsed.host_str() else {
            return EnqueueOutcome::InvalidUrl(url.to_string());
        };

        if !domain_allowed(host, allowed_domains) {
            return EnqueueOutcome::ForbiddenDomain;
        }

        if depth > max_depth {
            return EnqueueOutcome::MaxDepthReached;
        }

        if !self.visited.insert(normalized.clone()) {
            return EnqueueOutcome::AlreadyVisited;
        }

        self.depths.insert(normalized, depth);
        EnqueueOutcome::Enqueued { depth }
    }

    #[must_use]
    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    #[must_use]
    pub fn depth_of(&self, url: &str) -> Option<u32> {
        self.depths.get(url).map(|d| *d)
    }

    #[must_use]
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}

fn is_ignored_scheme(url: &str) -> bool {
    url.is_empty()
        || url.starts_with('#')
        || url.starts_with("javascript:")
        || url.starts_with("mailto:")
        || url.starts_with("tel:")
}

fn normalize(url: &str, base: &str) -> Option<String> {
    if url.is_empty() {
        return None;
    }
    if is_ignored_scheme(url) {
        return Some(url.to_string());
    }

    let resolved = match Url::parse(url) {
        Ok(absolute) => absolute,
        Err(_) => {
            let base = Url::parse(base).ok()?;
            base.join(url).ok()?
        }
    };

    let mut resolved = resolved;
    resolved.set_fragment(None);
    Some(resolved.to_string())
}

fn domain_allowed(host: &str, allowed_domains: &[String]) -> bool {
    allowed_domains.is_empty()
        || allowed_domains
            .iter()
            .any(|allowed| host == allowed || host.ends_with(&format!(".{allowed}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://example.com/index.html";

    #[test]
    fn visiting_the_same_url_twice_is_rejected() {
        let frontier = Frontier::new();
        assert!(matches!(
            frontier.enqueue("https://example.com/a", BASE, 0, &[], 10),
            EnqueueOutcome::Enqueued { depth: 0 }
        ));
        assert_eq!(
            frontier.enqueue("https://example.com/a", BASE, 0, &[], 10),
            EnqueueOutcome::AlreadyVisited
        );
    }

    #[test]
    fn relative_links_resolve_against_base() {
        let frontier = Frontier::new();
        let outcome = frontier.enqueue("/a", BASE, 1, &[], 10);
        assert!(matches!(outcome, EnqueueOutcome::Enqueued { depth: 1 }));
        assert!(frontier.is_visited("https://example.com/a"));
    }

    #[test]
    fn fragment_only_differences_dedupe() {
        let frontier = Frontier::new();
        frontier.enqueue("https://example.com/a#top", BASE, 0, &[], 10);
        assert_eq!(
            frontier.enqueue("https://example.com/a", BASE, 0, &[], 10),
            EnqueueOutcome::AlreadyVisited
        );
    }

    #[test]
    fn ignored_schemes_are_silently_skipped() {
        let frontier = Frontier::new();
        assert_eq!(
            frontier.enqueue("javascript:void(0)", BASE, 0, &[], 10),
            EnqueueOutcome::Skipped
        );
        assert_eq!(
            frontier.enqueue("mailto:a@b.com", BASE, 0, &[], 10),
            EnqueueOutcome::Skipped
        );
        assert_eq!(frontier.enqueue("#top", BASE, 0, &[], 10), EnqueueOutcome::Skipped);
    }

    #[test]
    fn empty_allowed_domains_permits_everything() {
        let frontier = Frontier::new();
        assert!(matches!(
            frontier.enqueue("https://other.com/x", BASE, 0, &[], 10),
            EnqueueOutcome::Enqueued { .. }
        ));
    }

    #[test]
    fn forbidden_domain_is_rejected() {
        let frontier = Frontier::new();
        let allowed = vec!["example.com".to_string()];
        assert_eq!(
            frontier.enqueue("https://other.com/x", BASE, 0, &allowed, 10),
            EnqueueOutcome::ForbiddenDomain
        );
        assert!(matches!(
            frontier.enqueue("https://sub.example.com/x", BASE, 0, &allowed, 10),
            EnqueueOutcome::Enqueued { .. }
        ));
    }

    #[test]
    fn depth_beyond_max_is_rejected() {
        let frontier = Frontier::new();
        assert_eq!(
            frontier.enqueue("https://example.com/a", BASE, 3, &[], 2),
            EnqueueOutcome::MaxDepthReached
        );
    }
}
