//! Per-domain-glob concurrency limiter
//!
//! This module provides glob-level concurrency limiting so the Fetcher
//! never holds more than `Parallelism` requests in flight against a given
//! domain glob at once.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Per-glob concurrency limiter using a lock-free `DashMap`.
///
/// Each glob gets its own semaphore sized to its rule's `Parallelism`,
/// created lazily on first acquire.
pub struct GlobLimiter {
    semaphores: DashMap<String, Arc<Semaphore>>,
}

impl Default for GlobLimiter {
    fn default() -> Self {
        Self::new()
    }
}

/// Clamp `parallelism` into the range `tokio::sync::Semaphore` accepts.
/// `usize::MAX` is used as the "no matching rule" sentinel elsewhere in
/// `fetch`, which would otherwise panic `Semaphore::new`.
fn clamp_permits(parallelism: usize) -> usize {
    parallelism.max(1).min(Semaphore::MAX_PERMITS)
}

impl GlobLimiter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            semaphores: DashMap::new(),
        }
    }

    /// Acquire a permit for `glob`, creating its semaphore on first use.
    ///
    /// Returns an owned permit released on drop. `parallelism` only takes
    /// effect the first time a glob is seen; later calls reuse the existing
    /// semaphore, matching a rule being fixed for the lifetime of a run.
    pub async fn acquire(&self, glob: &str, parallelism: usize) -> OwnedSemaphorePermit {
        let semaphore = self
            .semaphores
            .entry(glob.to_string())
            .or_insert_with(|| Arc::new(Semaphore::new(clamp_permits(parallelism))))
            .clone();

        loop {
            if let Ok(permit) = semaphore.clone().acquire_owned().await {
                return permit;
            }
            tracing::error!(glob, "semaphore closed unexpectedly, replacing");
            let fresh = Arc::new(Semaphore::new(parallelism.max(1)));
            self.semaphores.insert(glob.to_string(), fresh);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn limits_concurrency_per_glob() {
        let limiter = Arc::new(GlobLimiter::new());
        let p1 = limiter.acquire("*", 1).await;
        assert_eq!(limiter.semaphores.get("*").unwrap().available_permits(), 0);
        drop(p1);
        assert_eq!(limiter.semaphores.get("*").unwrap().available_permits(), 1);
    }

    #[tokio::test]
    async fn unbounded_parallelism_does_not_panic() {
        let limiter = GlobLimiter::new();
        let _permit = limiter.acquire("*", usize::MAX).await;
    }

    #[tokio::test]
    async fn distinct_globs_have_independent_budgets() {
        let limiter = GlobLimiter::new();
        let _a = limiter.acquire("a.com", 1).await;
        let _b = limiter.acquire("b.com", 1).await;
        assert_eq!(limiter.semaphores.len(), 2);
    }
}
