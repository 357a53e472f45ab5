//! Cache key construction
//!
//! Every logical key handed to the adapter is prefixed before it reaches
//! Redis, keeping cached responses apart from unrelated data in the same
//! database.
//!
//! # Example
//!
//! ```
//! use rediscache_store::keys;
//!
//! assert_eq!(keys::cache_key("page:1"), "rediscache:page:1");
//! ```

/// Literal prepended to every cache key before it reaches Redis
pub const KEY_PREFIX: &str = "rediscache:";

/// Build the Redis key for `key`
pub fn cache_key(key: &str) -> String {
    let mut full = String::with_capacity(KEY_PREFIX.len() + key.len());
    full.push_str(KEY_PREFIX);
    full.push_str(key);
    full
}
