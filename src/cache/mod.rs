//! Cache for normalized lookup results
//!
//! The lookup layer talks to a `Cache` trait object so the backend (SQLite on
//! disk, an in-process map, or nothing at all) is chosen at startup.

pub mod key;
pub mod memory;
pub mod storage;

use std::future::Future;
use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};

pub use key::cache_key;
pub use memory::MemoryCache;
pub use storage::CacheStorage;

/// Default lifetime of every cached lookup
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60); // 24 hr

/// Key/value store with per-entry expiry.
///
/// Implementations must be safe to share across tasks. Failures inside a
/// backend are logged and surface as a miss (`get`) or a dropped write (`put`).
pub trait Cache: Send + Sync {
    /// Fetch a live entry
    fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Store an entry that expires `ttl` after now
    fn put(&self, key: &str, operation: &str, data: &[u8], ttl: Duration);
}

/// Cache that never holds anything (`--no-cache`)
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCache;

impl Cache for NoopCache {
    fn get(&self, _key: &str) -> Option<Vec<u8>> {
        None
    }

    fn put(&self, _key: &str, _operation: &str, _data: &[u8], _ttl: Duration) {}
}

/// Outcome of a cache producer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Computed<T> {
    /// Trustworthy value; written to the cache
    Fresh(T),
    /// Fallback produced after an upstream failure; never cached
    Degraded(T),
}

impl<T> Computed<T> {
    pub fn into_inner(self) -> T {
        match self {
            Computed::Fresh(value) | Computed::Degraded(value) => value,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Computed::Degraded(_))
    }
}

/// Get-or-compute against `cache`.
///
/// A hit is reported as `Fresh`. Concurrent callers missing the same key each
/// run `producer`; no lock is taken around the computation.
pub async fn remember<T, F, Fut>(
    cache: &dyn Cache,
    key: &str,
    operation: &str,
    ttl: Duration,
    producer: F,
) -> Computed<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Computed<T>>,
{
    if let Some(data) = cache.get(key) {
        match serde_json::from_slice(&data) {
            Ok(value) => {
                log::debug!("Cache hit: {}", operation);
                return Computed::Fresh(value);
            }
            Err(e) => log::warn!("Discarding unreadable cache entry for {}: {}", operation, e),
        }
    }

    log::debug!("Cache miss: {}", operation);
    let computed = producer().await;
    match &computed {
        Computed::Fresh(value) => match serde_json::to_vec(value) {
            Ok(json) => cache.put(key, operation, &json, ttl),
            Err(e) => log::warn!("Failed to serialize {} for cache: {}", operation, e),
        },
        Computed::Degraded(_) => {
            log::debug!("Not caching degraded result for {}", operation);
        }
    }
    computed
}
