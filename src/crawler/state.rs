//! `CrawlerState` and its read-many, write-rare `Metrics` snapshot.
//!
//! All fields are mutated only under the single lock [`CrawlerState`] owns;
//! `processed` and `errors` are monotonically non-decreasing for the
//! lifetime of a run.

use std::sync::RwLock;

use chrono::{DateTime, Utc};

/// A `Copy` snapshot of the runtime's metrics, safe to read outside the
/// state lock once taken.
#[derive(Debug, Clone, Copy)]
pub struct MetricsSnapshot {
    pub processed: u64,
    pub errors: u64,
    pub start_time: Option<DateTime<Utc>>,
    pub last_processed: Option<DateTime<Utc>>,
}

impl MetricsSnapshot {
    #[must_use]
    pub fn processing_duration(&self) -> Option<chrono::Duration> {
        match (self.start_time, self.last_processed) {
            (Some(start), Some(last)) => Some(last - start),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    is_running: bool,
    start_time: Option<DateTime<Utc>>,
    current_source: Option<String>,
    processed: u64,
    errors: u64,
    last_processed: Option<DateTime<Utc>>,
}

/// Crawler lifecycle state: created idle, `start()` promotes it to running
/// and records `start_time`; `stop()` tears it back down to idle.
#[derive(Default)]
pub struct CrawlerState {
    inner: RwLock<Inner>,
}

impl CrawlerState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self, source: &str) {
        let mut inner = self.inner.write().expect("crawler state lock poisoned");
        inner.is_running = true;
        inner.start_time = Some(Utc::now());
        inner.current_source = Some(source.to_string());
    }

    pub fn stop(&self) {
        let mut inner = self.inner.write().expect("crawler state lock poisoned");
        inner.is_running = false;
        inner.current_source = None;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.read().expect("crawler state lock poisoned").is_running
    }

    #[must_use]
    pub fn current_source(&self) -> Option<String> {
        self.inner
            .read()
            .expect("crawler state lock poisoned")
            .current_source
            .clone()
    }

    /// Increment `processed` by one. Every classified element increments
    /// this exactly once, regardless of whether a processor ran.
    pub fn record_processed(&self) {
        let mut inner = self.inner.write().expect("crawler state lock poisoned");
        inner.processed += 1;
        inner.last_processed = Some(Utc::now());
    }

    /// Increment `errors` by one. A processor error increments this exactly
    /// once.
    pub fn record_error(&self) {
        let mut inner = self.inner.write().expect("crawler state lock poisoned");
        inner.errors += 1;
    }

    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        let inner = self.inner.read().expect("crawler state lock poisoned");
        MetricsSnapshot {
            processed: inner.processed,
            errors: inner.errors,
            start_time: inner.start_time,
            last_processed: inner.last_processed,
        }
    }
}
