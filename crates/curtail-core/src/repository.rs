use crate::error::StorageError;
use crate::record::UrlRecord;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

/// Type alias for store results.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Durable persistence for URL mappings.
///
/// The store enforces short-code uniqueness among live records (or defers it
/// to the allocator's own probe, depending on the allocation scheme).
#[async_trait]
pub trait MappingStore: Send + Sync + 'static {
    /// Retrieves the record for a given short code.
    /// Returns `None` if the code does not exist.
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>>;

    /// Retrieves the record carrying a given allocator-assigned id.
    /// Returns `None` if no record carries the id.
    async fn get_by_id(&self, id: u64) -> Result<Option<UrlRecord>>;

    /// Inserts a new record. Returns `Err(Conflict)` if the code is already
    /// mapped by a live record.
    async fn put(&self, record: UrlRecord) -> Result<()>;

    /// Deletes the record for a given short code.
    /// Returns `true` if the record existed and was removed.
    async fn delete(&self, code: &ShortCode) -> Result<bool>;
}
