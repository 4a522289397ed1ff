use curtail_core::repository::Result;
use curtail_core::{MappingStore, ShortCode, UrlCache};
use jiff::Timestamp;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Cache-aside resolution over the mapping store.
///
/// Reads check the cache first and fall back to the store on a miss; a live
/// record populates the cache on the way out. Absence is never cached.
/// Expiration is lazy: a resolve that finds an expired record deletes it
/// from the store and answers as if it never existed.
///
/// The path is safe under concurrent resolves of one code: duplicate store
/// reads are idempotent, racing cache populations are last-write-wins over
/// an identical value, and deleting an already-deleted record is treated as
/// already-absent.
#[derive(Debug, Clone)]
pub struct CachedResolver<S, C> {
    store: Arc<S>,
    cache: C,
}

impl<S: MappingStore, C: UrlCache> CachedResolver<S, C> {
    pub fn new(store: Arc<S>, cache: C) -> Self {
        Self { store, cache }
    }

    /// Returns a reference to the cache.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Resolves a short code to its long URL.
    ///
    /// Returns `None` when the code is unknown or its record has expired;
    /// callers cannot tell the two cases apart.
    pub async fn resolve(&self, code: &ShortCode) -> Result<Option<String>> {
        match self.cache.get_url(code).await {
            Ok(Some(url)) => return Ok(Some(url)),
            Ok(None) => {}
            Err(err) => {
                warn!(code = %code, error = %err, "cache read failed; falling back to store");
            }
        }

        let Some(record) = self.store.get(code).await? else {
            trace!(code = %code, "short code not found");
            return Ok(None);
        };

        if record.is_expired(Timestamp::now()) {
            debug!(code = %code, "record expired; deleting lazily");
            if let Err(err) = self.cache.del(code).await {
                warn!(code = %code, error = %err, "failed to drop stale cache entry");
            }
            // A concurrent resolve may have deleted it first; already-absent
            // is not an error.
            self.store.delete(code).await?;
            return Ok(None);
        }

        if let Err(err) = self.cache.set_url(code, &record.long_url).await {
            warn!(code = %code, error = %err, "failed to populate cache");
        }
        Ok(Some(record.long_url))
    }

    /// Proactively caches a known mapping, e.g. right after a shorten.
    ///
    /// Cache failures degrade to a warning; the mapping is already durable.
    pub async fn prime(&self, code: &ShortCode, long_url: &str) {
        if let Err(err) = self.cache.set_url(code, long_url).await {
            warn!(code = %code, error = %err, "failed to prime cache");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MokaUrlCache;
    use async_trait::async_trait;
    use curtail_core::UrlRecord;
    use curtail_storage::InMemoryStore;
    use jiff::SignedDuration;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Store decorator that counts reads and deletions.
    struct CountingStore {
        inner: InMemoryStore,
        gets: AtomicUsize,
        deletes: AtomicUsize,
    }

    impl CountingStore {
        fn new() -> Self {
            Self {
                inner: InMemoryStore::new(),
                gets: AtomicUsize::new(0),
                deletes: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl MappingStore for CountingStore {
        async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            self.inner.get(code).await
        }

        async fn get_by_id(&self, id: u64) -> Result<Option<UrlRecord>> {
            self.inner.get_by_id(id).await
        }

        async fn put(&self, record: UrlRecord) -> Result<()> {
            self.inner.put(record).await
        }

        async fn delete(&self, code: &ShortCode) -> Result<bool> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            self.inner.delete(code).await
        }
    }

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    fn record(code_str: &str, url: &str, expires_at: Timestamp) -> UrlRecord {
        UrlRecord {
            id: None,
            long_url: url.to_string(),
            short_code: code(code_str),
            created_at: Timestamp::now(),
            expires_at,
            source_ip: None,
        }
    }

    fn live(code_str: &str, url: &str) -> UrlRecord {
        record(code_str, url, Timestamp::now() + SignedDuration::from_hours(1))
    }

    fn resolver(store: Arc<CountingStore>) -> CachedResolver<CountingStore, MokaUrlCache> {
        CachedResolver::new(store, MokaUrlCache::new())
    }

    #[tokio::test]
    async fn resolves_via_store_and_populates_cache() {
        let store = Arc::new(CountingStore::new());
        store.put(live("abc123", "https://example.com")).await.unwrap();
        let resolver = resolver(Arc::clone(&store));

        let url = resolver.resolve(&code("abc123")).await.unwrap();
        assert_eq!(url, Some("https://example.com".to_string()));
        assert_eq!(store.gets.load(Ordering::SeqCst), 1);

        // Second resolve is served from the cache.
        let url = resolver.resolve(&code("abc123")).await.unwrap();
        assert_eq!(url, Some("https://example.com".to_string()));
        assert_eq!(store.gets.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn absence_is_not_memoized() {
        let store = Arc::new(CountingStore::new());
        let resolver = resolver(Arc::clone(&store));

        assert!(resolver.resolve(&code("abc123")).await.unwrap().is_none());
        assert!(resolver.resolve(&code("abc123")).await.unwrap().is_none());
        // Every miss reached the store: transient absence is never cached.
        assert_eq!(store.gets.load(Ordering::SeqCst), 2);
        assert_eq!(store.deletes.load(Ordering::SeqCst), 0);

        // The code becomes resolvable the moment a record lands.
        store.put(live("abc123", "https://example.com")).await.unwrap();
        assert_eq!(
            resolver.resolve(&code("abc123")).await.unwrap(),
            Some("https://example.com".to_string())
        );
    }

    #[tokio::test]
    async fn expired_record_is_deleted_exactly_once_and_not_served() {
        let store = Arc::new(CountingStore::new());
        let expired = Timestamp::now() - SignedDuration::from_secs(1);
        store
            .put(record("abc123", "https://example.com", expired))
            .await
            .unwrap();
        let resolver = resolver(Arc::clone(&store));

        assert!(resolver.resolve(&code("abc123")).await.unwrap().is_none());
        assert_eq!(store.deletes.load(Ordering::SeqCst), 1);

        // The record is gone; later resolves are plain misses.
        assert!(resolver.resolve(&code("abc123")).await.unwrap().is_none());
        assert_eq!(store.deletes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn store_fallback_after_cache_eviction() {
        let store = Arc::new(CountingStore::new());
        store.put(live("abc123", "https://example.com")).await.unwrap();
        let resolver = CachedResolver::new(
            Arc::clone(&store),
            MokaUrlCache::with_ttl(100, Duration::from_millis(50)),
        );

        assert!(resolver.resolve(&code("abc123")).await.unwrap().is_some());
        tokio::time::sleep(Duration::from_millis(100)).await;

        // The entry has been evicted; the store answers again.
        let url = resolver.resolve(&code("abc123")).await.unwrap();
        assert_eq!(url, Some("https://example.com".to_string()));
        assert_eq!(store.gets.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn prime_makes_resolution_a_cache_hit() {
        let store = Arc::new(CountingStore::new());
        store.put(live("abc123", "https://example.com")).await.unwrap();
        let resolver = resolver(Arc::clone(&store));

        resolver.prime(&code("abc123"), "https://example.com").await;

        let url = resolver.resolve(&code("abc123")).await.unwrap();
        assert_eq!(url, Some("https://example.com".to_string()));
        assert_eq!(store.gets.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn concurrent_resolves_of_one_code_all_succeed() {
        let store = Arc::new(CountingStore::new());
        store.put(live("abc123", "https://example.com")).await.unwrap();
        let resolver = Arc::new(resolver(Arc::clone(&store)));

        let mut handles = vec![];
        for _ in 0..10 {
            let resolver = Arc::clone(&resolver);
            handles.push(tokio::spawn(async move {
                resolver.resolve(&code("abc123")).await.unwrap()
            }));
        }

        for handle in handles {
            assert_eq!(
                handle.await.unwrap(),
                Some("https://example.com".to_string())
            );
        }
    }
}
