//! The generic cache capability
//!
//! Any storage backend that implements [`Cache`] can sit behind the HTTP
//! caching transport. Keys are plain strings and values are opaque bytes.

use crate::error::HttpCacheError;
use crate::HttpCacheResult;
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;

/// Outcome of a cache read
///
/// Keeps a miss apart from a failed lookup so callers that care can tell a
/// cold cache from an unreachable store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    /// The key holds a value
    Hit(Bytes),
    /// The key holds nothing
    Miss,
    /// The store could not answer
    Error(HttpCacheError),
}

impl CacheLookup {
    /// Collapse into an `Option`, treating errors as misses
    pub fn into_option(self) -> Option<Bytes> {
        match self {
            CacheLookup::Hit(value) => Some(value),
            CacheLookup::Miss | CacheLookup::Error(_) => None,
        }
    }

    /// Convert into a `Result`, keeping errors
    pub fn into_result(self) -> HttpCacheResult<Option<Bytes>> {
        match self {
            CacheLookup::Hit(value) => Ok(Some(value)),
            CacheLookup::Miss => Ok(None),
            CacheLookup::Error(err) => Err(err),
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, CacheLookup::Hit(_))
    }

    pub fn is_miss(&self) -> bool {
        matches!(self, CacheLookup::Miss)
    }
}

/// Cache capability consumed by the HTTP caching transport
#[async_trait]
pub trait Cache: Send + Sync {
    /// Get the value stored under `key`
    async fn get(&self, key: &str) -> CacheLookup;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: Bytes) -> Result<(), HttpCacheError>;

    /// Remove `key`. Best effort: failures are never reported.
    async fn delete(&self, key: &str);
}

#[async_trait]
impl<C: Cache + ?Sized> Cache for Arc<C> {
    async fn get(&self, key: &str) -> CacheLookup {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: Bytes) -> Result<(), HttpCacheError> {
        (**self).set(key, value).await
    }

    async fn delete(&self, key: &str) {
        (**self).delete(key).await
    }
}
