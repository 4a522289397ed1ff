use crate::config::ShortenerConfig;
use crate::error::Result;
use crate::validate::normalize_url;
use curtail_allocator::Allocator;
use curtail_cache::CachedResolver;
use curtail_core::{MappingStore, ShortCode, UrlCache, UrlRecord};
use jiff::Timestamp;
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Orchestrates shortening and resolution.
///
/// Generic over the allocation strategy, the mapping store, and the
/// resolution cache. The composition root picks exactly one allocator;
/// strategies are never mixed within a service, since their uniqueness
/// guarantees differ.
pub struct ShortenerService<A, S, C> {
    allocator: Arc<A>,
    store: Arc<S>,
    resolver: CachedResolver<S, C>,
    config: ShortenerConfig,
}

impl<A: Allocator, S: MappingStore, C: UrlCache> ShortenerService<A, S, C> {
    pub fn new(allocator: A, store: Arc<S>, cache: C, config: ShortenerConfig) -> Self {
        Self {
            allocator: Arc::new(allocator),
            resolver: CachedResolver::new(Arc::clone(&store), cache),
            store,
            config,
        }
    }

    /// Shortens a long URL, returning the allocated short code.
    ///
    /// Validation, allocation, persistence and cache priming happen in that
    /// order; a failure at any step surfaces before the next takes effect,
    /// so no record is persisted without its code and no code escapes
    /// without its record.
    pub async fn shorten(&self, long_url: &str, source_ip: Option<&str>) -> Result<ShortCode> {
        let normalized = normalize_url(long_url, self.config.max_url_len)?;

        let allocation = self.allocator.allocate(&normalized).await?;

        let created_at = Timestamp::now();
        let record = UrlRecord {
            id: allocation.id,
            long_url: normalized.clone(),
            short_code: allocation.code.clone(),
            created_at,
            expires_at: created_at + self.config.record_ttl,
            source_ip: source_ip.map(str::to_owned),
        };
        self.store.put(record).await?;
        self.resolver.prime(&allocation.code, &normalized).await;

        info!(code = %allocation.code, "shortened url");
        Ok(allocation.code)
    }

    /// Resolves a short code to its long URL.
    ///
    /// Returns `None` for unknown, expired, and malformed codes alike. A
    /// code with symbols outside the alphabet cannot name a mapping, so it
    /// is answered without touching storage.
    pub async fn resolve(&self, code: &str) -> Result<Option<String>> {
        let code = match ShortCode::parse(code) {
            Ok(code) => code,
            Err(err) => {
                debug!(code, error = %err, "malformed short code treated as not found");
                return Ok(None);
            }
        };
        trace!(code = %code, "resolving short code");
        Ok(self.resolver.resolve(&code).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShortenerError;
    use async_trait::async_trait;
    use curtail_allocator::{Allocation, AllocatorError, RandomAllocator, RandomSettings};
    use curtail_cache::MokaUrlCache;
    use curtail_storage::InMemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingAllocator {
        calls: AtomicUsize,
    }

    impl CountingAllocator {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Allocator for CountingAllocator {
        async fn allocate(&self, _long_url: &str) -> std::result::Result<Allocation, AllocatorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Allocation {
                id: None,
                code: ShortCode::new_unchecked("fixed01"),
            })
        }
    }

    struct ExhaustedAllocator;

    #[async_trait]
    impl Allocator for ExhaustedAllocator {
        async fn allocate(&self, _long_url: &str) -> std::result::Result<Allocation, AllocatorError> {
            Err(AllocatorError::Exhausted { attempts: 3 })
        }
    }

    fn service<A: Allocator>(
        allocator: A,
    ) -> (ShortenerService<A, InMemoryStore, MokaUrlCache>, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        let service = ShortenerService::new(
            allocator,
            Arc::clone(&store),
            MokaUrlCache::new(),
            ShortenerConfig::default(),
        );
        (service, store)
    }

    fn random_service() -> ShortenerService<RandomAllocator<InMemoryStore>, InMemoryStore, MokaUrlCache>
    {
        let store = Arc::new(InMemoryStore::new());
        let allocator = RandomAllocator::new(Arc::clone(&store), RandomSettings::default());
        ShortenerService::new(
            allocator,
            store,
            MokaUrlCache::new(),
            ShortenerConfig::default(),
        )
    }

    #[tokio::test]
    async fn shorten_normalizes_and_resolves_back() {
        let service = random_service();

        let code = service.shorten("example.com", None).await.unwrap();
        let url = service.resolve(code.as_str()).await.unwrap();
        assert_eq!(url, Some("https://example.com".to_string()));
    }

    #[tokio::test]
    async fn over_length_url_is_rejected_before_allocation() {
        let (service, _store) = service(CountingAllocator::new());

        let long = format!("example.com/{}", "a".repeat(150));
        let err = service.shorten(&long, None).await.unwrap_err();
        assert!(matches!(err, ShortenerError::InvalidUrl(_)));
        assert_eq!(service.allocator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn persisted_record_carries_expiry_and_provenance() {
        let (service, store) = service(CountingAllocator::new());

        let before = Timestamp::now();
        let code = service.shorten("example.com", Some("203.0.113.7")).await.unwrap();

        let record = store.get(&code).await.unwrap().unwrap();
        assert_eq!(record.long_url, "https://example.com");
        assert_eq!(record.source_ip.as_deref(), Some("203.0.113.7"));
        assert_eq!(
            record.expires_at,
            record.created_at + crate::config::DEFAULT_RECORD_TTL
        );
        assert!(record.created_at >= before);
    }

    #[tokio::test]
    async fn resolve_unknown_code_is_none() {
        let service = random_service();
        assert!(service.resolve("zzzzzz1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn malformed_code_is_answered_without_a_store_read() {
        struct PanickingStore;

        #[async_trait]
        impl MappingStore for PanickingStore {
            async fn get(
                &self,
                _code: &ShortCode,
            ) -> curtail_core::repository::Result<Option<UrlRecord>> {
                panic!("storage must not be consulted for malformed codes");
            }
            async fn get_by_id(
                &self,
                _id: u64,
            ) -> curtail_core::repository::Result<Option<UrlRecord>> {
                panic!("storage must not be consulted for malformed codes");
            }
            async fn put(&self, _record: UrlRecord) -> curtail_core::repository::Result<()> {
                Ok(())
            }
            async fn delete(&self, _code: &ShortCode) -> curtail_core::repository::Result<bool> {
                Ok(false)
            }
        }

        let service = ShortenerService::new(
            CountingAllocator::new(),
            Arc::new(PanickingStore),
            MokaUrlCache::new(),
            ShortenerConfig::default(),
        );

        assert!(service.resolve("has-dash").await.unwrap().is_none());
        assert!(service.resolve("").await.unwrap().is_none());
        assert!(service.resolve("spa ce").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn exhausted_allocation_maps_to_a_conflict() {
        let (service, _store) = service(ExhaustedAllocator);

        let err = service.shorten("example.com", None).await.unwrap_err();
        assert!(matches!(
            err,
            ShortenerError::AllocationExhausted { attempts: 3 }
        ));
    }

    #[tokio::test]
    async fn shortening_twice_yields_distinct_codes() {
        let service = random_service();

        let a = service.shorten("https://one.example", None).await.unwrap();
        let b = service.shorten("https://two.example", None).await.unwrap();
        assert_ne!(a, b);

        assert_eq!(
            service.resolve(a.as_str()).await.unwrap(),
            Some("https://one.example".to_string())
        );
        assert_eq!(
            service.resolve(b.as_str()).await.unwrap(),
            Some("https://two.example".to_string())
        );
    }
}
