use async_trait::async_trait;
use curtail_core::cache::Result;
use curtail_core::{ShortCode, UrlCache};
use moka::future::Cache;
use std::time::Duration;
use tracing::{debug, trace};

pub const DEFAULT_CAPACITY: u64 = 10_000;
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// An in-memory resolution cache backed by Moka.
///
/// Entries map short codes to long URLs and expire a fixed wall-clock TTL
/// after insertion. The TTL bounds how stale a served mapping can be; it is
/// independent of the record's own expiry, which governs link lifetime.
#[derive(Debug, Clone)]
pub struct MokaUrlCache {
    cache: Cache<String, String>,
}

impl MokaUrlCache {
    /// Creates a cache with the default capacity and TTL.
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_CAPACITY, DEFAULT_TTL)
    }

    /// Creates a cache with a custom maximum capacity and entry TTL.
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }
}

impl Default for MokaUrlCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlCache for MokaUrlCache {
    async fn get_url(&self, code: &ShortCode) -> Result<Option<String>> {
        let key = code.as_str().to_string();
        match self.cache.get(&key).await {
            Some(url) => {
                debug!(code = %code, "cache hit");
                Ok(Some(url))
            }
            None => {
                trace!(code = %code, "cache miss");
                Ok(None)
            }
        }
    }

    async fn set_url(&self, code: &ShortCode, long_url: &str) -> Result<()> {
        trace!(code = %code, "caching resolved url");
        self.cache
            .insert(code.as_str().to_string(), long_url.to_string())
            .await;
        Ok(())
    }

    async fn del(&self, code: &ShortCode) -> Result<()> {
        trace!(code = %code, "removing cache entry (if present)");
        self.cache.invalidate(code.as_str()).await;
        Ok(())
    }
}
