//! In-memory store of the last good payload per request.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;

/// A cached payload together with the instant it was fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// The decoded JSON body of the successful response.
    pub payload: serde_json::Value,
    /// When the payload was fetched.
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Age of the entry relative to `now`. Clock skew into the future counts as zero.
    #[must_use]
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.fetched_at).to_std().unwrap_or(Duration::ZERO)
    }
}

/// Snapshot of the store's contents, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of keys currently held.
    pub size: usize,
    /// The keys, sorted.
    pub keys: Vec<String>,
}

/// Keyed store of `(payload, fetched_at)` entries.
///
/// There is no eviction: an entry lives until it is overwritten by a newer fetch
/// for the same key or the store is cleared. The TTL is carried only so callers can
/// judge freshness; the store itself never expires anything.
#[derive(Debug)]
pub struct CacheStore {
    map: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl CacheStore {
    /// Creates an empty store with the given nominal TTL.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            map: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// The nominal time-to-live of an entry.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns a copy of the entry for `key`, if any.
    pub async fn get(&self, key: &str) -> Option<CacheEntry> {
        self.map.read().await.get(key).cloned()
    }

    /// Replaces the entry for `key`.
    ///
    /// An entry never moves backwards in time: a write whose `fetched_at` is older
    /// than the one already stored is dropped.
    pub async fn put(&self, key: &str, payload: serde_json::Value, fetched_at: DateTime<Utc>) {
        let mut guard = self.map.write().await;
        if let Some(existing) = guard.get(key)
            && existing.fetched_at > fetched_at
        {
            return;
        }
        guard.insert(
            key.to_string(),
            CacheEntry {
                payload,
                fetched_at,
            },
        );
    }

    /// Removes every entry.
    pub async fn clear(&self) {
        self.map.write().await.clear();
    }

    /// Returns the number of entries and their keys.
    pub async fn stats(&self) -> CacheStats {
        let guard = self.map.read().await;
        let mut keys: Vec<String> = guard.keys().cloned().collect();
        keys.sort();
        CacheStats {
            size: keys.len(),
            keys,
        }
    }
}
