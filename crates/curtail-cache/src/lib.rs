//! Resolution caching for the URL shortener.
//!
//! Provides the moka-backed [`MokaUrlCache`] and the cache-aside
//! [`CachedResolver`], which fronts the mapping store on the resolve path
//! and owns lazy expiration of stale records.

pub mod cache;
pub mod resolver;

pub use cache::MokaUrlCache;
pub use resolver::CachedResolver;
