//! rediscache fetch tool
//!
//! Fetches each URL given on the command line twice through a Redis-backed
//! caching client and logs whether the response came from cache.
//!
//! ```text
//! REDISCACHE__REDIS__URL=redis://127.0.0.1:6379 rediscache https://example.com/
//! ```

use rediscache::{build_client, caching_client, served_from_cache, AppConfig, RedisCache};
use std::env;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging
fn init_tracing() {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "rediscache={},rediscache_store={},rediscache_http={},http_cache=warn,reqwest=warn",
            log_level, log_level, log_level
        ))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    let urls: Vec<String> = env::args().skip(1).collect();
    if urls.is_empty() {
        warn!("Usage: rediscache <url> [<url>...]");
        return Ok(());
    }

    let config = AppConfig::load()?;
    info!(
        "Starting rediscache v{} (redis: {})",
        env!("CARGO_PKG_VERSION"),
        config.redis.url
    );

    let cache = RedisCache::from_config(&config.redis).await?;
    cache.ping().await?;

    let client = caching_client(Arc::new(cache), build_client(&config.transport)?);

    for url in &urls {
        for attempt in 1..=2 {
            let response = client.get(url.as_str()).send().await?;
            let status = response.status().as_u16();
            let from_cache = served_from_cache(response.headers());
            let body = response.bytes().await?;
            info!(
                url = %url,
                attempt,
                status,
                bytes = body.len(),
                from_cache,
                "Fetched"
            );
        }
    }

    Ok(())
}
