//! rediscache Core Library
//!
//! This crate provides the foundational types, traits, and error handling
//! shared by the rediscache crates. It includes:
//!
//! - The generic `Cache` capability every storage backend implements
//! - The three-way `CacheLookup` result returned by cache reads
//! - Unified error handling
//! - Application configuration
//! - An in-memory `Cache` backend

pub mod config;
pub mod error;
pub mod memory;
pub mod traits;

pub use config::AppConfig;
pub use error::HttpCacheError;
pub use memory::MemoryCache;
pub use traits::{Cache, CacheLookup};

/// Result type alias using HttpCacheError
pub type HttpCacheResult<T> = Result<T, HttpCacheError>;
