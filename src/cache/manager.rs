//! In-memory forecast cache
//!
//! Provides a `ForecastCache` that keeps the combined forecast per location
//! key for a fixed freshness window. Staleness is checked lazily on lookup;
//! nothing runs in the background.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::debug;

use crate::data::CombinedForecast;

/// How long a cached forecast is served before it is refetched
pub const CACHE_FRESHNESS: Duration = Duration::from_secs(10 * 60);

/// Stored entry
#[derive(Debug, Clone)]
struct CacheEntry {
    data: CombinedForecast,
    /// When the data was fetched
    fetched_at: DateTime<Utc>,
    /// Recency stamp for least-recently-used eviction
    last_used: u64,
}

/// Data plus metadata about where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct CachedData<T> {
    pub data: T,
    /// When the data was originally fetched
    pub cached_at: DateTime<Utc>,
    /// Whether the data was served from the cache
    pub from_cache: bool,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, CacheEntry>,
    clock: u64,
}

impl Inner {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }
}

/// Process-wide map from location key to the last fetched forecast
///
/// Safe to share between tasks behind an `Arc`. Unbounded by default; use
/// [`ForecastCache::with_capacity`] when the set of locations is open-ended.
#[derive(Debug, Default)]
pub struct ForecastCache {
    inner: Mutex<Inner>,
    capacity: Option<usize>,
}

impl ForecastCache {
    /// Creates an unbounded cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache holding at most `capacity` locations
    ///
    /// Storing a new key into a full cache evicts the least recently used entry.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            capacity: Some(capacity.max(1)),
        }
    }

    /// Returns the cached forecast if it is younger than [`CACHE_FRESHNESS`]
    ///
    /// Stale entries and entries fetched after `now` are misses. Stale entries
    /// stay in place until overwritten.
    pub fn lookup(&self, key: &str, now: DateTime<Utc>) -> Option<CachedData<CombinedForecast>> {
        let mut inner = self.inner.lock();
        let stamp = inner.tick();
        let entry = inner.entries.get_mut(key)?;

        match (now - entry.fetched_at).to_std() {
            Ok(age) if age < CACHE_FRESHNESS => {
                debug!(key, age_secs = age.as_secs(), "cache hit");
                entry.last_used = stamp;
                Some(CachedData {
                    data: entry.data.clone(),
                    cached_at: entry.fetched_at,
                    from_cache: true,
                })
            }
            Ok(age) => {
                debug!(key, age_secs = age.as_secs(), "cache entry is stale");
                None
            }
            Err(_) => {
                debug!(key, "cache entry fetched in the future, ignoring");
                None
            }
        }
    }

    /// Stores a forecast, replacing any entry under the same key
    pub fn store(&self, key: &str, data: CombinedForecast, now: DateTime<Utc>) {
        let mut inner = self.inner.lock();
        let stamp = inner.tick();

        if let Some(capacity) = self.capacity {
            if !inner.entries.contains_key(key) && inner.entries.len() >= capacity {
                let oldest = inner
                    .entries
                    .iter()
                    .min_by_key(|(_, e)| e.last_used)
                    .map(|(k, _)| k.clone());
                if let Some(oldest) = oldest {
                    debug!(evicted = %oldest, "cache full, evicting least recently used");
                    inner.entries.remove(&oldest);
                }
            }
        }

        inner.entries.insert(
            key.to_string(),
            CacheEntry {
                data,
                fetched_at: now,
                last_used: stamp,
            },
        );
    }

    /// Removes one entry
    pub fn invalidate(&self, key: &str) {
        self.inner.lock().entries.remove(key);
    }

    /// Removes all entries
    pub fn clear(&self) {
        self.inner.lock().entries.clear();
    }

    /// Number of stored entries, stale ones included
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
