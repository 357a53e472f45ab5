//! HTTP caching for rediscache
//!
//! Plugs any [`Cache`](rediscache_core::traits::Cache) backend (Redis,
//! in-memory, or a custom implementation) into the `http-cache` middleware
//! for `reqwest`. The middleware decides per request whether to answer from
//! the cache, revalidate, or forward and store. This crate only adapts
//! storage:
//!
//! - [`ResponseStore`] implements `http_cache::CacheManager` over a `Cache`
//! - [`caching_client`] assembles the middleware stack
//! - [`served_from_cache`] tells hits from live fetches

pub mod client;
pub mod manager;

pub use client::{build_client, caching_client, served_from_cache, CACHE_STATUS};
pub use manager::ResponseStore;
pub use reqwest;
pub use reqwest_middleware::{self, ClientWithMiddleware};
