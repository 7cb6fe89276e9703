//! TTL-based memoization of verification results.
//!
//! Keys combine all four input fields; entries are evicted lazily on the
//! next lookup after expiry. No background sweep: entries are small and the
//! working set is bounded by the distinct places a session visits.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use geoverify_core::{CoordinateInput, Source, VerificationResult};

struct CacheEntry {
    result: VerificationResult,
    created_at: Instant,
}

/// Shared verification cache.
///
/// Interior mutability behind a synchronous mutex; the lock is never held
/// across an await, so overlapping in-flight resolutions contend only for
/// the map operation itself.
pub struct VerificationCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl VerificationCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Deterministic cache key over all four input fields.
    ///
    /// Coordinates are rounded to six decimal places (~0.1 m) so float noise
    /// from upstream does not fragment the cache.
    #[must_use]
    pub fn key(input: &CoordinateInput) -> String {
        format!(
            "{:.6}_{:.6}_{}_{}",
            input.lat, input.lng, input.context, input.location_name
        )
    }

    /// Returns the cached result for `key` with `source` rewritten to
    /// [`Source::Cache`], or `None` on a miss.
    ///
    /// An entry older than the TTL is evicted here and reported as a miss;
    /// expired entries are never served.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<VerificationResult> {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        match entries.get(key) {
            Some(entry) if entry.created_at.elapsed() <= self.ttl => {
                let mut result = entry.result.clone();
                result.source = Source::Cache;
                Some(result)
            }
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Stores `result` under `key`, overwriting any previous entry.
    pub fn set(&self, key: String, result: VerificationResult) {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        entries.insert(
            key,
            CacheEntry {
                result,
                created_at: Instant::now(),
            },
        );
    }

    pub fn clear(&self) {
        self.entries.lock().expect("cache mutex poisoned").clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache mutex poisoned").len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
