//! In-process cache backed by `DashMap`

use dashmap::DashMap;
use std::time::{Duration, Instant};

use super::Cache;

#[derive(Debug, Clone)]
struct MemoryEntry {
    data: Vec<u8>,
    /// `None` when the TTL reaches past what `Instant` can represent
    expires_at: Option<Instant>,
}

impl MemoryEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// Thread-safe map cache; entries vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<String, MemoryEntry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries.iter().filter(|e| e.is_live(now)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        let now = Instant::now();
        let live = self.entries.get(key).and_then(|entry| {
            entry.is_live(now).then(|| entry.data.clone())
        });

        if live.is_none() {
            self.entries.remove_if(key, |_, entry| !entry.is_live(now));
        }
        live
    }

    fn put(&self, key: &str, _operation: &str, data: &[u8], ttl: Duration) {
        self.entries.insert(
            key.to_string(),
            MemoryEntry {
                data: data.to_vec(),
                expires_at: Instant::now().checked_add(ttl),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get() {
        let cache = MemoryCache::new();
        cache.put("k", "search", b"[]", Duration::from_secs(60));

        assert_eq!(cache.get("k"), Some(b"[]".to_vec()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_huge_ttl_never_expires() {
        let cache = MemoryCache::new();
        cache.put("k", "search", b"1", Duration::from_secs(u64::MAX));

        assert_eq!(cache.get("k"), Some(b"1".to_vec()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let cache = MemoryCache::new();
        cache.put("k", "search", b"[]", Duration::ZERO);

        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_keys_expire_independently() {
        let cache = MemoryCache::new();
        cache.put("short", "history", b"1", Duration::ZERO);
        cache.put("long", "history", b"2", Duration::from_secs(60));

        assert_eq!(cache.get("short"), None);
        assert_eq!(cache.get("long"), Some(b"2".to_vec()));
    }
}
