use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

struct CacheValue<V> {
    value: V,
    expires_at: Option<Instant>,
}

/// In-memory cache shared by providers. Entries older than the ttl are treated as missing.
#[derive(Clone)]
pub struct Cache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Arc<Mutex<HashMap<K, CacheValue<V>>>>,
    ttl: Option<Duration>,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Send + Sync + std::fmt::Debug + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::with_ttl(None)
    }

    pub fn with_ttl(ttl: Option<Duration>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        let mut cache = self.inner.lock().await;
        let Some(entry) = cache.get(key) else {
            debug!("Cache MISS for key: {:?}", key);
            return None;
        };
        if entry.expires_at.is_some_and(|e| e <= Instant::now()) {
            debug!("Cache entry expired for key: {:?}", key);
            cache.remove(key);
            return None;
        }
        debug!("Cache HIT for key: {:?}", key);
        Some(entry.value.clone())
    }

    pub async fn put(&self, key: K, value: V) {
        let expires_at = self.ttl.map(|ttl| Instant::now() + ttl);
        let mut cache = self.inner.lock().await;
        debug!("Cache PUT for key: {:?}", key);
        cache.insert(key, CacheValue { value, expires_at });
    }
}

impl<K, V> Default for Cache<K, V>
where
    K: Eq + Hash + Send + Sync + std::fmt::Debug + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cache_get_put() {
        let cache = Cache::<String, f64>::new();

        // Initially, cache is empty
        assert!(cache.get(&"USD".to_string()).await.is_none());

        cache.put("USD".to_string(), 83.0).await;
        assert_eq!(cache.get(&"USD".to_string()).await, Some(83.0));

        // Get a non-existent key
        assert!(cache.get(&"EUR".to_string()).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_entry_expires() {
        let cache = Cache::<String, f64>::with_ttl(Some(Duration::from_secs(60)));
        cache.put("bitcoin:usd".to_string(), 65000.0).await;

        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(cache.get(&"bitcoin:usd".to_string()).await, Some(65000.0));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.get(&"bitcoin:usd".to_string()).await.is_none());
    }
}
