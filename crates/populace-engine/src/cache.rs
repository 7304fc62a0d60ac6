//! Bounded, time-expiring caches for reactions and decision analyses.
//!
//! [`TtlLruCache`] is a thread-safe map with a capacity bound and a
//! time-to-live. Expired entries read as absent wherever they sit; once
//! the cache is full, expired entries are purged first and then the least
//! recently used entry is evicted. All state sits behind one
//! [`std::sync::Mutex`], held only for map operations and never across an
//! await point.
//!
//! Keys come from [`fingerprint`]: a SHA-256 digest over the canonical
//! JSON of the inputs, so identical inputs always map to the same key.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::Duration;

use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::time::Instant;

use crate::error::EngineError;

/// Thread-safe TTL + LRU cache. Safe to share via `Arc`.
pub struct TtlLruCache<K, V> {
    capacity: usize,
    ttl: Duration,
    inner: Mutex<CacheInner<K, V>>,
}

/// Mutable state held inside the mutex.
struct CacheInner<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    /// Access stamp -> key, oldest first.
    recency: BTreeMap<u64, K>,
    /// Monotonic access counter.
    clock: u64,
}

struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    stamp: u64,
}

impl<K, V> CacheInner<K, V>
where
    K: Eq + Hash + Clone,
{
    fn next_stamp(&mut self) -> u64 {
        self.clock = self.clock.saturating_add(1);
        self.clock
    }

    fn remove(&mut self, key: &K) {
        if let Some(entry) = self.entries.remove(key) {
            self.recency.remove(&entry.stamp);
        }
    }

    fn purge_expired(&mut self, ttl: Duration, now: Instant) {
        let expired: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, entry)| now.duration_since(entry.inserted_at) >= ttl)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            self.remove(key);
        }
    }

    fn evict_oldest(&mut self) -> bool {
        match self.recency.pop_first() {
            Some((_, key)) => {
                self.entries.remove(&key);
                true
            }
            None => false,
        }
    }
}

impl<K, V> TtlLruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create an empty cache holding at most `capacity` entries for `ttl`.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity,
            ttl,
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                recency: BTreeMap::new(),
                clock: 0,
            }),
        }
    }

    /// Look up a live entry, marking it most recently used.
    ///
    /// Expired entries are removed and reported as a miss. A poisoned lock
    /// also reads as a miss.
    pub fn get(&self, key: &K) -> Option<V> {
        let Ok(mut inner) = self.inner.lock() else {
            return None;
        };
        let now = Instant::now();

        let inserted_at = inner.entries.get(key)?.inserted_at;
        if now.duration_since(inserted_at) >= self.ttl {
            inner.remove(key);
            return None;
        }

        let stamp = inner.next_stamp();
        let entry = inner.entries.get_mut(key)?;
        let previous = std::mem::replace(&mut entry.stamp, stamp);
        let value = entry.value.clone();
        inner.recency.remove(&previous);
        inner.recency.insert(stamp, key.clone());
        Some(value)
    }

    /// Insert or replace an entry, evicting if the cache is full.
    ///
    /// Concurrent inserts for the same key are harmless; the last write
    /// wins.
    pub fn put(&self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }
        let Ok(mut inner) = self.inner.lock() else {
            return;
        };
        let now = Instant::now();

        inner.remove(&key);
        if inner.entries.len() >= self.capacity {
            inner.purge_expired(self.ttl, now);
        }
        while inner.entries.len() >= self.capacity && inner.evict_oldest() {}

        let stamp = inner.next_stamp();
        inner.recency.insert(stamp, key.clone());
        inner.entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: now,
                stamp,
            },
        );
    }

    /// Number of stored entries, including any not yet purged after expiry.
    pub fn len(&self) -> usize {
        self.inner.lock().map_or(0, |inner| inner.entries.len())
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Stable fingerprint over two serializable values.
///
/// Each value is converted to a JSON tree (object keys sorted) and
/// rendered compactly; the two renderings are joined and hashed with
/// SHA-256. The result is a 64-character lowercase hex string.
pub fn fingerprint<A, B>(first: &A, second: &B) -> Result<String, EngineError>
where
    A: Serialize + ?Sized,
    B: Serialize + ?Sized,
{
    let first = serde_json::to_value(first)?.to_string();
    let second = serde_json::to_value(second)?.to_string();

    let mut hasher = Sha256::new();
    hasher.update(first.as_bytes());
    hasher.update(b"_");
    hasher.update(second.as_bytes());
    let digest = hasher.finalize();

    let mut hex = String::with_capacity(64);
    for byte in digest {
        let _ = write!(hex, "{byte:02x}");
    }
    Ok(hex)
}
