//! In-memory cache backing per-session flash data.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use postboard_core::ports::{Cache, CacheError};

struct CacheEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|exp| now > exp)
    }
}

/// HashMap behind an async RwLock. Data is lost on process restart.
pub struct InMemoryCache {
    store: RwLock<HashMap<String, CacheEntry>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        let store = self.store.read().await;
        let entry = store.get(key)?;

        if entry.is_expired(Instant::now()) {
            return None;
        }

        Some(entry.value.clone())
    }

    async fn take(&self, key: &str) -> Option<String> {
        let mut store = self.store.write().await;
        let entry = store.remove(key)?;

        if entry.is_expired(Instant::now()) {
            return None;
        }

        Some(entry.value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        let mut store = self.store.write().await;

        // Writes are the only place old sessions get cleaned up.
        let now = Instant::now();
        store.retain(|_, entry| !entry.is_expired(now));

        store.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at: ttl.map(|d| now + d),
            },
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_take_reads_once() {
        let cache = InMemoryCache::new();
        cache.set("flash:abc", "{}", None).await.unwrap();

        assert_eq!(cache.take("flash:abc").await, Some("{}".to_string()));
        assert_eq!(cache.take("flash:abc").await, None);
        assert_eq!(cache.get("flash:abc").await, None);
    }

    #[tokio::test]
    async fn test_expired_entries_are_invisible() {
        let cache = InMemoryCache::new();
        cache.set("long", "value", None).await.unwrap();
        cache
            .set("short", "value", Some(Duration::from_millis(1)))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(cache.get("short").await, None);

        // The next write drops the stale entry.
        cache.set("other", "value", None).await.unwrap();
        assert!(!cache.store.read().await.contains_key("short"));
        assert_eq!(cache.get("long").await, Some("value".to_string()));
    }
}
