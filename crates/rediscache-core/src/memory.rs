//! In-memory cache backend
//!
//! Holds everything in a process-local map. Useful wherever Redis is not
//! available, and as a reference implementation of [`Cache`].

use crate::error::HttpCacheError;
use crate::traits::{Cache, CacheLookup};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
pub struct MemoryCache {
    items: RwLock<HashMap<String, Bytes>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> CacheLookup {
        match self.items.read().await.get(key) {
            Some(value) => {
                debug!("Memory cache HIT: {}", key);
                CacheLookup::Hit(value.clone())
            }
            None => {
                debug!("Memory cache MISS: {}", key);
                CacheLookup::Miss
            }
        }
    }

    async fn set(&self, key: &str, value: Bytes) -> Result<(), HttpCacheError> {
        self.items.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) {
        self.items.write().await.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = MemoryCache::new();
        cache
            .set("page:1", Bytes::from_static(b"<html>ok</html>"))
            .await
            .unwrap();

        assert_eq!(
            cache.get("page:1").await,
            CacheLookup::Hit(Bytes::from_static(b"<html>ok</html>"))
        );
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("missing").await, CacheLookup::Miss);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete() {
        let cache = MemoryCache::new();
        cache.set("k", Bytes::from_static(b"v")).await.unwrap();
        cache.delete("k").await;
        assert_eq!(cache.get("k").await, CacheLookup::Miss);

        // Deleting again is a no-op
        cache.delete("k").await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_usable_through_shared_trait_object() {
        let cache: Arc<dyn Cache> = Arc::new(MemoryCache::new());
        cache.set("k", Bytes::from_static(b"v")).await.unwrap();
        assert!(cache.get("k").await.is_hit());
    }
}
