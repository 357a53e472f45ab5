//! Unified error handling for rediscache
//!
//! Every failure a cache backend or the HTTP caching transport can report is
//! expressed as a variant of [`HttpCacheError`].

use thiserror::Error;

/// Main error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HttpCacheError {
    // ==================== Cache Errors ====================
    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Cache connection failed: {0}")]
    CacheConnection(String),

    /// Reply could not be decoded into bytes
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    // ==================== HTTP Errors ====================
    #[error("Transport error: {0}")]
    Transport(String),

    /// Stored entry could not be encoded or decoded
    #[error("Invalid cached response: {0}")]
    InvalidResponse(String),

    // ==================== Configuration Errors ====================
    #[error("Configuration error: {0}")]
    Config(String),
}

impl HttpCacheError {
    /// Returns the error code used in structured log fields
    pub fn error_code(&self) -> &'static str {
        match self {
            HttpCacheError::Cache(_) => "cache_error",
            HttpCacheError::CacheConnection(_) => "cache_connection_error",
            HttpCacheError::TypeMismatch(_) => "type_mismatch",
            HttpCacheError::Transport(_) => "transport_error",
            HttpCacheError::InvalidResponse(_) => "invalid_response",
            HttpCacheError::Config(_) => "config_error",
        }
    }

    /// True for failures of the link to the store rather than of a command
    pub fn is_connection(&self) -> bool {
        matches!(self, HttpCacheError::CacheConnection(_))
    }
}

// ==================== From implementations ====================

impl From<config::ConfigError> for HttpCacheError {
    fn from(err: config::ConfigError) -> Self {
        HttpCacheError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            HttpCacheError::CacheConnection("refused".to_string()).error_code(),
            "cache_connection_error"
        );
        assert_eq!(
            HttpCacheError::TypeMismatch("list".to_string()).error_code(),
            "type_mismatch"
        );
        assert_eq!(
            HttpCacheError::Transport("timeout".to_string()).error_code(),
            "transport_error"
        );
    }

    #[test]
    fn test_error_display() {
        let err = HttpCacheError::Cache("WRONGTYPE".to_string());
        assert_eq!(err.to_string(), "Cache error: WRONGTYPE");
    }

    #[test]
    fn test_is_connection() {
        assert!(HttpCacheError::CacheConnection("reset".to_string()).is_connection());
        assert!(!HttpCacheError::Cache("oops".to_string()).is_connection());
    }

    #[test]
    fn test_from_config_error() {
        let err: HttpCacheError = config::ConfigError::NotFound("redis.url".to_string()).into();
        assert_eq!(err.error_code(), "config_error");
    }
}
