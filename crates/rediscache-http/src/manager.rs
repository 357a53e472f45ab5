//! Cache manager backed by a byte [`Cache`]
//!
//! The HTTP cache middleware hands over a response together with its
//! [`CachePolicy`]. [`ResponseStore`] serializes both into one JSON entry and
//! keeps it in the wrapped cache under the middleware's key
//! (`GET:<url>` and so on). Failures of the cache never fail a request: a
//! broken read is a miss and a broken write leaves the live response as is.

use async_trait::async_trait;
use bytes::Bytes;
use http_cache::{CacheManager, HttpResponse};
use http_cache_semantics::CachePolicy;
use rediscache_core::error::HttpCacheError;
use rediscache_core::traits::{Cache, CacheLookup};
use rediscache_core::HttpCacheResult;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Serialize)]
struct EntryRef<'a> {
    response: &'a HttpResponse,
    policy: &'a CachePolicy,
}

#[derive(Deserialize)]
struct Entry {
    response: HttpResponse,
    policy: CachePolicy,
}

/// [`CacheManager`] over any [`Cache`]
#[derive(Clone)]
pub struct ResponseStore {
    cache: Arc<dyn Cache>,
}

impl ResponseStore {
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<dyn Cache> {
        &self.cache
    }

    /// Serialize a response and its policy into one cache value
    pub fn encode(response: &HttpResponse, policy: &CachePolicy) -> HttpCacheResult<Bytes> {
        serde_json::to_vec(&EntryRef { response, policy })
            .map(Bytes::from)
            .map_err(|e| HttpCacheError::InvalidResponse(e.to_string()))
    }

    /// Parse a cache value written by [`encode`](Self::encode)
    pub fn decode(raw: &[u8]) -> HttpCacheResult<(HttpResponse, CachePolicy)> {
        let entry: Entry = serde_json::from_slice(raw)
            .map_err(|e| HttpCacheError::InvalidResponse(e.to_string()))?;
        Ok((entry.response, entry.policy))
    }
}

#[async_trait]
impl CacheManager for ResponseStore {
    async fn get(
        &self,
        cache_key: &str,
    ) -> http_cache::Result<Option<(HttpResponse, CachePolicy)>> {
        match self.cache.get(cache_key).await {
            CacheLookup::Hit(raw) => match Self::decode(&raw) {
                Ok(entry) => {
                    debug!(key = cache_key, "Cached response found");
                    Ok(Some(entry))
                }
                Err(e) => {
                    warn!(key = cache_key, "Ignoring undecodable cache entry: {}", e);
                    Ok(None)
                }
            },
            CacheLookup::Miss => Ok(None),
            CacheLookup::Error(e) => {
                warn!(
                    key = cache_key,
                    code = e.error_code(),
                    "Cache unavailable, forwarding: {}",
                    e
                );
                Ok(None)
            }
        }
    }

    async fn put(
        &self,
        cache_key: String,
        res: HttpResponse,
        policy: CachePolicy,
    ) -> http_cache::Result<HttpResponse> {
        let stored = match Self::encode(&res, &policy) {
            Ok(raw) => self.cache.set(&cache_key, raw).await,
            Err(e) => Err(e),
        };

        if let Err(e) = stored {
            warn!(
                key = %cache_key,
                code = e.error_code(),
                "Failed to store response: {}",
                e
            );
        }

        Ok(res)
    }

    async fn delete(&self, cache_key: &str) -> http_cache::Result<()> {
        self.cache.delete(cache_key).await;
        Ok(())
    }
}
