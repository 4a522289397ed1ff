use crate::error::CacheError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

/// Type alias for cache results.
pub type Result<T> = std::result::Result<T, CacheError>;

/// A time-bounded cache in front of resolution reads.
///
/// Keys are short codes, values are the resolved long URLs. Absence is never
/// memoized: only a present long URL may enter the cache, so a transient
/// "not found" cannot shadow a later insertion.
#[async_trait]
pub trait UrlCache: Send + Sync + 'static {
    /// Get the cached long URL for a code.
    ///
    /// Returns `Ok(None)` if the key is not in the cache.
    async fn get_url(&self, code: &ShortCode) -> Result<Option<String>>;

    /// Store the long URL for a code. Entries expire after the
    /// implementation's wall-clock TTL.
    async fn set_url(&self, code: &ShortCode, long_url: &str) -> Result<()>;

    /// Remove a code from the cache.
    /// It is not an error if the key does not exist.
    async fn del(&self, code: &ShortCode) -> Result<()>;
}
