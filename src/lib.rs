//! Redis storage for an HTTP caching client
//!
//! Re-exports the workspace crates and provides the construction entry
//! points:
//!
//! - [`new_with_client`]: a Redis-backed [`Cache`] from an existing connection
//! - [`new`]: a caching `reqwest` client storing responses in Redis
//! - [`new_transport`]: a caching `reqwest` client over any [`Cache`]
//!
//! Both clients mark every response with `x-cache: HIT` or `x-cache: MISS`;
//! [`served_from_cache`] reads the mark.
//!
//! # Example
//!
//! ```no_run
//! use rediscache::{reqwest, served_from_cache};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = redis::Client::open("redis://127.0.0.1:6379")?;
//!     let conn = redis::aio::ConnectionManager::new(client).await?;
//!
//!     let http = rediscache::new(conn, reqwest::Client::new());
//!     let response = http.get("https://example.com/").send().await?;
//!     println!("from cache: {}", served_from_cache(response.headers()));
//!     Ok(())
//! }
//! ```

use redis::aio::ConnectionLike;
use std::sync::Arc;

pub use rediscache_core::config::{AppConfig, RedisConfig, TransportConfig};
pub use rediscache_core::{Cache, CacheLookup, HttpCacheError, HttpCacheResult, MemoryCache};
pub use rediscache_http::{
    build_client, caching_client, reqwest, served_from_cache, ClientWithMiddleware,
    ResponseStore, CACHE_STATUS,
};
pub use rediscache_store::{keys, new_with_client, RedisCache};

/// Build a caching HTTP client that stores responses in Redis through
/// `conn` and forwards misses through `client`
pub fn new<C>(conn: C, client: reqwest::Client) -> ClientWithMiddleware
where
    C: ConnectionLike + Clone + Send + Sync + 'static,
{
    caching_client(new_with_client(conn), client)
}

/// Build a caching HTTP client over any cache, forwarding misses through a
/// default `reqwest` client
pub fn new_transport(cache: Arc<dyn Cache>) -> ClientWithMiddleware {
    caching_client(cache, reqwest::Client::new())
}
