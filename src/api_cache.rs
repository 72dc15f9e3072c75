use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry<V> {
    value: V,
    fetched_at: u64,
}

/// In-memory response cache keyed by URL. The clock is always passed in, so
/// callers and tests control expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtlCache<V> {
    ttl_secs: u64,
    entries: HashMap<String, CacheEntry<V>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl_secs: ttl.as_secs(),
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn get(&self, key: &str, now: SystemTime) -> Option<V> {
        let entry = self.entries.get(key)?;
        if self.is_fresh(entry.fetched_at, now) {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: V, now: SystemTime) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                value,
                fetched_at: system_time_to_secs(now).unwrap_or_default(),
            },
        );
    }

    /// Drop stale entries; returns how many were removed.
    pub fn purge_expired(&mut self, now: SystemTime) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl_secs;
        let now_secs = system_time_to_secs(now).unwrap_or_default();
        self.entries
            .retain(|_, e| now_secs.saturating_sub(e.fetched_at) < ttl);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_fresh(&self, fetched_at: u64, now: SystemTime) -> bool {
        let Some(now) = system_time_to_secs(now) else {
            return false;
        };
        now.saturating_sub(fetched_at) < self.ttl_secs
    }
}

fn system_time_to_secs(time: SystemTime) -> Option<u64> {
    time.duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn entries_expire_after_ttl() {
        let mut cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("https://api/x", 7u32, at(1_000));
        assert_eq!(cache.get("https://api/x", at(1_059)), Some(7));
        assert_eq!(cache.get("https://api/x", at(1_060)), None);
        assert_eq!(cache.get("https://api/y", at(1_000)), None);
    }

    #[test]
    fn purge_removes_only_stale() {
        let mut cache = TtlCache::new(Duration::from_secs(10));
        cache.insert("old", 1u32, at(0));
        cache.insert("new", 2u32, at(15));
        assert_eq!(cache.purge_expired(at(20)), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("new", at(20)), Some(2));
    }
}
