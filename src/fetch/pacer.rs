//! Lock-free per-domain-glob request pacing
//!
//! Enforces the Fetcher's `{Delay, RandomDelay}` guarantee: between any two
//! consecutive requests issued against the same glob, at least
//! `Delay + uniform(0, RandomDelay)` elapses. Unlike a steady-state token
//! bucket, this tracks only the next permitted instant per glob, reserved
//! via compare-and-swap so concurrent callers never race past each other.
//!
//! Cache-line aligned to avoid false sharing between unrelated domain globs
//! under concurrent access.

use dashmap::DashMap;
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Sentinel meaning "no request has been scheduled against this glob yet".
const UNSET: u64 = u64::MAX;

#[repr(align(64))]
#[derive(Debug, Default)]
struct GlobSlot {
    next_allowed_nanos: AtomicU64,
}

impl GlobSlot {
    fn unset() -> Self {
        Self {
            next_allowed_nanos: AtomicU64::new(UNSET),
        }
    }
}

/// Per-domain-glob pacer shared by a [`crate::fetch::Fetcher`].
pub struct DomainPacer {
    slots: DashMap<String, Arc<GlobSlot>>,
    base_time: Instant,
}

impl Default for DomainPacer {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainPacer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
            base_time: Instant::now(),
        }
    }

    /// Reserve the next permitted instant for `glob` and return how long the
    /// caller must sleep before issuing the request. Returns `Duration::ZERO`
    /// immediately when both `delay` and `random_delay` are zero: property 11
    /// requires no synthetic delay in that case.
    pub fn reserve(&self, glob: &str, delay: Duration, random_delay: Duration) -> Duration {
        if delay.is_zero() && random_delay.is_zero() {
            return Duration::ZERO;
        }

        let jitter = if random_delay.is_zero() {
            Duration::ZERO
        } else {
            Duration::from_nanos(rand::rng().random_range(0..random_delay.as_nanos() as u64))
        };
        let gap = (delay + jitter).as_nanos() as u64;

        let slot = self
            .slots
            .entry(glob.to_string())
            .or_insert_with(|| Arc::new(GlobSlot::unset()))
            .clone();

        let now = self.base_time.elapsed().as_nanos() as u64;
        let mut prev = slot.next_allowed_nanos.load(Ordering::Relaxed);

        loop {
            let earliest = if prev == UNSET {
                now
            } else {
                prev.saturating_add(gap)
            };
            let scheduled = now.max(earliest);

            match slot.next_allowed_nanos.compare_exchange_weak(
                prev,
                scheduled,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return Duration::from_nanos(scheduled.saturating_sub(now)),
                Err(actual) => {
                    prev = actual;
                    std::hint::spin_loop();
                }
            }
        }
    }

    /// Number of distinct globs currently tracked; exposed for tests.
    #[must_use]
    pub fn tracked_count(&self) -> usize {
        self.slots.len()
    }
}
