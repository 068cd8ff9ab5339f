use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::clock::Clock;

#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: T,
    /// Epoch milliseconds; the entry is live while `expires_at > now`.
    pub expires_at: i64,
}

/// In-memory TTL cache with lazy eviction.
///
/// Stale entries are dropped only when a lookup finds them. There is no
/// sweeper and no size bound. Concurrent writers for the same key race and
/// the last insert wins.
pub struct TtlCache<T> {
    entries: RwLock<HashMap<String, CacheEntry<T>>>,
    ttl_ms: i64,
    clock: Arc<dyn Clock>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl_ms: i64, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl_ms,
            clock,
        }
    }

    pub async fn get(&self, key: &str) -> Option<T> {
        self.entry(key).await.map(|entry| entry.value)
    }

    /// Live entry for `key`, evicting it first if it has gone stale.
    pub async fn entry(&self, key: &str) -> Option<CacheEntry<T>> {
        let now = self.clock.now_ms();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.expires_at > now => return Some(entry.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get(key)
            && entry.expires_at <= now
        {
            entries.remove(key);
            debug!(cache_key = %key, "Evicted stale cache entry");
        }
        None
    }

    pub async fn insert(&self, key: String, value: T) {
        self.insert_at(key, value, self.clock.now()).await;
    }

    /// Insert with the TTL counted from `created` rather than from now.
    pub async fn insert_at(&self, key: String, value: T, created: DateTime<Utc>) {
        let expires_at = created.timestamp_millis().saturating_add(self.ttl_ms);
        let mut entries = self.entries.write().await;
        entries.insert(key, CacheEntry { value, expires_at });
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::{Duration, TimeZone, Utc};

    fn setup(ttl_ms: i64) -> (Arc<ManualClock>, TtlCache<String>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap(),
        ));
        let cache = TtlCache::new(ttl_ms, clock.clone());
        (clock, cache)
    }

    #[tokio::test]
    async fn returns_value_before_expiry() {
        let (clock, cache) = setup(1000);
        cache.insert("jakarta".into(), "v".into()).await;

        clock.advance(Duration::milliseconds(999));
        assert_eq!(cache.get("jakarta").await.as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn expires_exactly_at_deadline_and_evicts() {
        let (clock, cache) = setup(1000);
        cache.insert("jakarta".into(), "v".into()).await;

        clock.advance(Duration::milliseconds(1000));
        assert!(cache.get("jakarta").await.is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn entry_past_deadline_is_a_miss() {
        let (clock, cache) = setup(1000);
        cache.insert("paris".into(), "v".into()).await;

        clock.advance(Duration::milliseconds(1001));
        assert!(cache.entry("paris").await.is_none());
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn expires_at_is_creation_plus_ttl() {
        let (clock, cache) = setup(5000);
        let created = clock.now_ms();
        cache.insert("cairo".into(), "v".into()).await;

        let entry = cache.entry("cairo").await.unwrap();
        assert_eq!(entry.expires_at - created, 5000);
    }

    #[tokio::test]
    async fn insert_replaces_existing_entry() {
        let (clock, cache) = setup(1000);
        cache.insert("k".into(), "first".into()).await;
        clock.advance(Duration::milliseconds(500));
        cache.insert("k".into(), "second".into()).await;

        clock.advance(Duration::milliseconds(700));
        assert_eq!(cache.get("k").await.as_deref(), Some("second"));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn insert_at_counts_ttl_from_given_instant() {
        let (clock, cache) = setup(5000);
        let started = clock.now();
        clock.advance(Duration::milliseconds(1200));
        cache.insert_at("medina".into(), "v".into(), started).await;

        let entry = cache.entry("medina").await.unwrap();
        assert_eq!(entry.expires_at, started.timestamp_millis() + 5000);

        clock.advance(Duration::milliseconds(3800));
        assert!(cache.get("medina").await.is_none());
    }

    #[tokio::test]
    async fn missing_key_is_none() {
        let (_clock, cache) = setup(1000);
        assert!(cache.get("nowhere").await.is_none());
    }
}
