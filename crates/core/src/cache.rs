//! Single-slot cache with a freshness window
//!
//! Time is always passed in by the caller so freshness checks stay
//! deterministic under test.

use std::time::{Duration, Instant};

/// How long an acquired country collection stays fresh
pub const FRESHNESS_WINDOW: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    stored_at: Instant,
}

/// Holds at most one value together with the instant it was stored
#[derive(Debug, Clone)]
pub struct FreshnessCache<T> {
    ttl: Duration,
    entry: Option<Entry<T>>,
}

impl<T> FreshnessCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    /// Return the cached value if it is younger than the window at `now`
    pub fn get(&self, now: Instant) -> Option<&T> {
        self.entry
            .as_ref()
            .filter(|e| now.saturating_duration_since(e.stored_at) < self.ttl)
            .map(|e| &e.value)
    }

    /// Replace the slot with `value`, stamped at `now`
    pub fn store(&mut self, value: T, now: Instant) {
        self.entry = Some(Entry {
            value,
            stored_at: now,
        });
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}
