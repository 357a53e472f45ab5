//! Caching HTTP client
//!
//! Builds a `reqwest` client wrapped in the `http-cache` middleware, with a
//! [`ResponseStore`] as its storage. The middleware stamps every response
//! with `x-cache: HIT` or `x-cache: MISS`; [`served_from_cache`] reads that
//! mark back.

use http_cache_reqwest::{Cache as CacheMiddleware, CacheMode, HttpCache, HttpCacheOptions};
use rediscache_core::config::TransportConfig;
use rediscache_core::error::HttpCacheError;
use rediscache_core::traits::Cache;
use rediscache_core::HttpCacheResult;
use reqwest::header::HeaderMap;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::manager::ResponseStore;

/// Header the middleware sets to `HIT` on responses served from cache
pub const CACHE_STATUS: &str = "x-cache";

/// Build the outbound client from the `transport` configuration section
pub fn build_client(config: &TransportConfig) -> HttpCacheResult<Client> {
    debug!(
        timeout_secs = config.timeout_secs,
        user_agent = %config.user_agent,
        "Building HTTP client"
    );

    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(config.user_agent.as_str())
        .build()
        .map_err(|e| HttpCacheError::Transport(format!("Failed to build HTTP client: {}", e)))
}

/// Wrap `client` so responses are cached in `cache`
pub fn caching_client(cache: Arc<dyn Cache>, client: Client) -> ClientWithMiddleware {
    ClientBuilder::new(client)
        .with(CacheMiddleware(HttpCache {
            mode: CacheMode::Default,
            manager: ResponseStore::new(cache),
            options: HttpCacheOptions::default(),
        }))
        .build()
}

/// True when the response headers carry the middleware's cache-hit mark
pub fn served_from_cache(headers: &HeaderMap) -> bool {
    headers
        .get(CACHE_STATUS)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.eq_ignore_ascii_case("HIT"))
}
