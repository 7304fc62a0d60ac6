//! Thread-safe counters for simulator activity.
//!
//! A [`SimulationCounters`] lives inside each reaction simulator and is
//! updated from every concurrent worker. The orchestrator takes a snapshot
//! before and after a run and reports the difference as that run's
//! [`RunStats`](populace_types::RunStats).

use std::sync::Mutex;

/// Thread-safe activity counters. Safe to share via `Arc`.
#[derive(Debug, Default)]
pub struct SimulationCounters {
    inner: Mutex<CounterSnapshot>,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    /// External model calls issued.
    pub external_calls: u64,
    /// Reactions served from the cache.
    pub cache_hits: u64,
    /// Fallback reactions produced.
    pub fallbacks: u64,
}

impl CounterSnapshot {
    /// Counts accumulated since `earlier`.
    pub const fn since(self, earlier: Self) -> Self {
        Self {
            external_calls: self.external_calls.saturating_sub(earlier.external_calls),
            cache_hits: self.cache_hits.saturating_sub(earlier.cache_hits),
            fallbacks: self.fallbacks.saturating_sub(earlier.fallbacks),
        }
    }
}

impl SimulationCounters {
    /// Create zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one external model call.
    pub fn record_external_call(&self) {
        self.update(|c| c.external_calls = c.external_calls.saturating_add(1));
    }

    /// Record one cache hit.
    pub fn record_cache_hit(&self) {
        self.update(|c| c.cache_hits = c.cache_hits.saturating_add(1));
    }

    /// Record one fallback reaction.
    pub fn record_fallback(&self) {
        self.update(|c| c.fallbacks = c.fallbacks.saturating_add(1));
    }

    /// Return a snapshot of the counters.
    ///
    /// Returns zeroes if the mutex is poisoned.
    pub fn snapshot(&self) -> CounterSnapshot {
        self.inner.lock().map_or_else(|_| CounterSnapshot::default(), |inner| *inner)
    }

    fn update(&self, apply: impl FnOnce(&mut CounterSnapshot)) {
        // A poisoned lock skips the update rather than panicking.
        if let Ok(mut inner) = self.inner.lock() {
            apply(&mut inner);
        }
    }
}
