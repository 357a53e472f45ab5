//! Redis cache adapter for rediscache
//!
//! Stores opaque response bytes in Redis on behalf of the HTTP caching
//! transport. Implements the `Cache` trait from rediscache-core by mapping
//! its three operations onto three Redis commands:
//!
//! | Operation | Command |
//! |-----------|---------|
//! | `get`     | `GET <prefix><key>` |
//! | `set`     | `SET <prefix><key> <bytes>` (no expiry, no flags) |
//! | `delete`  | `DEL <prefix><key>` |
//!
//! Every key is prefixed with [`keys::KEY_PREFIX`] (`rediscache:`). The
//! adapter owns no resources. It clones the connection handle it was given
//! for every command and never opens, closes or reconnects it itself.
//!
//! # Example
//!
//! ```no_run
//! use bytes::Bytes;
//! use rediscache_core::traits::{Cache, CacheLookup};
//! use rediscache_store::RedisCache;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cache = RedisCache::connect("redis://127.0.0.1:6379").await?;
//!
//!     cache.set("page:1", Bytes::from_static(b"<html>ok</html>")).await?;
//!     assert!(matches!(cache.get("page:1").await, CacheLookup::Hit(_)));
//!
//!     cache.delete("page:1").await;
//!     Ok(())
//! }
//! ```

pub mod keys;

#[cfg(any(test, feature = "test-util"))]
pub mod fake;

use async_trait::async_trait;
use bytes::Bytes;
use rediscache_core::config::RedisConfig;
use rediscache_core::error::HttpCacheError;
use rediscache_core::traits::{Cache, CacheLookup};
use rediscache_core::HttpCacheResult;
use redis::aio::{ConnectionLike, ConnectionManager};
use redis::{AsyncCommands, Client, RedisError};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Redis-backed implementation of [`Cache`]
///
/// Generic over the connection handle so any cloneable async connection can
/// be supplied. The default, [`ConnectionManager`], multiplexes concurrent
/// callers over one socket and reconnects after failures.
#[derive(Clone)]
pub struct RedisCache<C = ConnectionManager> {
    conn: C,
}

impl RedisCache<ConnectionManager> {
    /// Connect to Redis and build an adapter
    ///
    /// # Errors
    ///
    /// Returns `HttpCacheError::CacheConnection` if the URL is invalid or
    /// the connection cannot be established
    pub async fn connect(url: &str) -> HttpCacheResult<Self> {
        debug!("Connecting to Redis at {}", url);

        let client = Client::open(url).map_err(|e| {
            error!("Failed to create Redis client: {}", e);
            HttpCacheError::CacheConnection(format!("Invalid Redis URL: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            error!("Failed to establish Redis connection: {}", e);
            HttpCacheError::CacheConnection(format!("Connection failed: {}", e))
        })?;

        debug!("Redis connection established successfully");
        Ok(Self::new(manager))
    }

    /// Connect using the `redis` section of the application configuration
    pub async fn from_config(config: &RedisConfig) -> HttpCacheResult<Self> {
        Self::connect(&config.url).await
    }
}

impl<C> RedisCache<C>
where
    C: ConnectionLike + Clone + Send + Sync + 'static,
{
    /// Wrap an already established connection
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    /// Redis key addressed for the logical `key`
    pub fn store_key(&self, key: &str) -> String {
        keys::cache_key(key)
    }

    /// Ping the Redis server to check connectivity
    ///
    /// # Errors
    ///
    /// Returns the mapped Redis error if the round trip fails
    pub async fn ping(&self) -> HttpCacheResult<()> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_redis_error)?;
        Ok(())
    }

    /// Convert RedisError to HttpCacheError
    ///
    /// Server replies such as `WRONGTYPE` stay `Cache`; `TypeMismatch` is
    /// reserved for replies the client could not decode into bytes.
    fn map_redis_error(err: RedisError) -> HttpCacheError {
        if err.is_io_error() || err.is_connection_dropped() || err.is_connection_refusal() {
            return HttpCacheError::CacheConnection(err.to_string());
        }

        match err.kind() {
            redis::ErrorKind::TypeError => HttpCacheError::TypeMismatch(err.to_string()),
            _ => HttpCacheError::Cache(err.to_string()),
        }
    }
}

#[async_trait]
impl<C> Cache for RedisCache<C>
where
    C: ConnectionLike + Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> CacheLookup {
        let store_key = self.store_key(key);
        debug!("GET {}", store_key);
        let mut conn = self.conn.clone();

        let result: Result<Option<Vec<u8>>, RedisError> = conn.get(&store_key).await;

        match result {
            Ok(Some(value)) => {
                debug!("Cache HIT: {}", store_key);
                CacheLookup::Hit(Bytes::from(value))
            }
            Ok(None) => {
                debug!("Cache MISS: {}", store_key);
                CacheLookup::Miss
            }
            Err(e) => {
                let err = Self::map_redis_error(e);
                warn!(
                    key = %store_key,
                    code = err.error_code(),
                    "Cache lookup failed: {}",
                    err
                );
                CacheLookup::Error(err)
            }
        }
    }

    async fn set(&self, key: &str, value: Bytes) -> Result<(), HttpCacheError> {
        let store_key = self.store_key(key);
        debug!("SET {} ({} bytes)", store_key, value.len());
        let mut conn = self.conn.clone();

        let _: () = conn
            .set(&store_key, value.to_vec())
            .await
            .map_err(|e| {
                let err = Self::map_redis_error(e);
                error!(
                    key = %store_key,
                    code = err.error_code(),
                    "Cache write failed: {}",
                    err
                );
                err
            })?;

        Ok(())
    }

    async fn delete(&self, key: &str) {
        let store_key = self.store_key(key);
        debug!("DEL {}", store_key);
        let mut conn = self.conn.clone();

        let result: Result<i64, RedisError> = conn.del(&store_key).await;
        if let Err(e) = result {
            warn!(key = %store_key, "Cache delete failed, ignoring: {}", e);
        }
    }
}

/// Build an adapter from a caller-supplied connection, exposed through the
/// generic cache capability
pub fn new_with_client<C>(conn: C) -> Arc<dyn Cache>
where
    C: ConnectionLike + Clone + Send + Sync + 'static,
{
    Arc::new(RedisCache::new(conn))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeConnection, Failure};

    fn setup_cache() -> (RedisCache<FakeConnection>, FakeConnection) {
        let conn = FakeConnection::new();
        (RedisCache::new(conn.clone()), conn)
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let (cache, _) = setup_cache();

        cache
            .set("page:1", Bytes::from_static(b"<html>ok</html>"))
            .await
            .unwrap();

        assert_eq!(
            cache.get("page:1").await,
            CacheLookup::Hit(Bytes::from_static(b"<html>ok</html>"))
        );
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let (cache, _) = setup_cache();
        assert_eq!(cache.get("never-written").await, CacheLookup::Miss);
    }

    #[tokio::test]
    async fn test_delete() {
        let (cache, conn) = setup_cache();

        cache
            .set("page:1", Bytes::from_static(b"<html>ok</html>"))
            .await
            .unwrap();
        cache.delete("page:1").await;

        assert_eq!(cache.get("page:1").await, CacheLookup::Miss);
        assert_eq!(cache.get("page:1").await.into_option(), None);
        assert!(conn.is_empty());
    }

    #[tokio::test]
    async fn test_delete_nonexistent_is_silent() {
        let (cache, conn) = setup_cache();
        cache.delete("nothing-here").await;
        assert_eq!(conn.commands(), vec!["DEL rediscache:nothing-here"]);
    }

    #[tokio::test]
    async fn test_keys_are_prefixed() {
        let (cache, conn) = setup_cache();

        cache.set("foo", Bytes::from_static(b"bar")).await.unwrap();

        assert_eq!(conn.raw_get("rediscache:foo"), Some(b"bar".to_vec()));
        assert_eq!(conn.raw_get("foo"), None);

        cache.get("foo").await;
        cache.delete("foo").await;
        assert_eq!(
            conn.commands(),
            vec!["SET rediscache:foo", "GET rediscache:foo", "DEL rediscache:foo"]
        );
    }

    #[tokio::test]
    async fn test_bare_key_in_store_is_invisible() {
        let (cache, conn) = setup_cache();
        conn.raw_set("foo", b"unrelated");
        assert_eq!(cache.get("foo").await, CacheLookup::Miss);
    }

    #[tokio::test]
    async fn test_store_key_uses_fixed_prefix() {
        let (cache, _) = setup_cache();
        assert_eq!(cache.store_key("foo"), "rediscache:foo");
        assert_eq!(cache.store_key("GET:https://x/"), "rediscache:GET:https://x/");
    }

    #[tokio::test]
    async fn test_binary_values_survive() {
        let (cache, _) = setup_cache();
        let payload = Bytes::from(vec![0u8, 159, 146, 150, 255, b'\r', b'\n']);

        cache.set("bin", payload.clone()).await.unwrap();
        assert_eq!(cache.get("bin").await, CacheLookup::Hit(payload));
    }

    #[tokio::test]
    async fn test_set_failure_returns_error() {
        let (cache, conn) = setup_cache();
        conn.fail_with(Failure::Connection);

        let err = cache
            .set("page:1", Bytes::from_static(b"<html>ok</html>"))
            .await
            .unwrap_err();

        assert!(err.is_connection());
        assert!(conn.is_empty());
    }

    #[tokio::test]
    async fn test_get_failure_is_reported_not_panicked() {
        let (cache, conn) = setup_cache();
        cache.set("k", Bytes::from_static(b"v")).await.unwrap();
        conn.fail_with(Failure::Connection);

        let lookup = cache.get("k").await;
        assert!(matches!(lookup, CacheLookup::Error(HttpCacheError::CacheConnection(_))));
        assert_eq!(lookup.into_option(), None);
    }

    #[tokio::test]
    async fn test_get_wrongtype_reply_is_a_store_error() {
        let (cache, conn) = setup_cache();
        conn.fail_with(Failure::WrongType);

        let lookup = cache.get("k").await;
        assert!(matches!(
            lookup,
            CacheLookup::Error(HttpCacheError::Cache(ref msg)) if msg.contains("WRONGTYPE")
        ));
    }

    #[tokio::test]
    async fn test_delete_failure_is_swallowed() {
        let (cache, conn) = setup_cache();
        conn.fail_with(Failure::Connection);

        // Must neither panic nor report
        cache.delete("k").await;
    }

    #[tokio::test]
    async fn test_ping() {
        let (cache, conn) = setup_cache();
        assert!(cache.ping().await.is_ok());

        conn.fail_with(Failure::Connection);
        assert!(cache.ping().await.is_err());
    }

    #[tokio::test]
    async fn test_new_with_client_exposes_capability() {
        let conn = FakeConnection::new();
        let cache = new_with_client(conn.clone());

        cache.set("foo", Bytes::from_static(b"bar")).await.unwrap();
        assert!(cache.get("foo").await.is_hit());
        assert_eq!(conn.raw_get("rediscache:foo"), Some(b"bar".to_vec()));
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    async fn test_live_round_trip() {
        let cache = RedisCache::connect("redis://127.0.0.1:6379")
            .await
            .expect("Failed to connect to Redis");
        cache.ping().await.unwrap();

        cache
            .set("live:page", Bytes::from_static(b"<html>ok</html>"))
            .await
            .unwrap();
        assert!(cache.get("live:page").await.is_hit());

        cache.delete("live:page").await;
        assert_eq!(cache.get("live:page").await, CacheLookup::Miss);
    }
}
