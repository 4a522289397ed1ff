use async_trait::async_trait;
use curtail_core::repository::Result;
use curtail_core::{MappingStore, ShortCode, StorageError, UrlRecord};
use dashmap::DashMap;
use jiff::Timestamp;

/// In-memory implementation of the mapping store using DashMap.
///
/// DashMap's sharded locks allow concurrent reads and writes to different
/// buckets without blocking, which matches the store's access pattern:
/// many independent single-key operations.
///
/// The store is plain persistence: expiry is recorded on the record but not
/// enforced on reads; lazy expiration is the resolution layer's job. The
/// exception is uniqueness, which only holds among live records: inserting
/// over an expired record is allowed, because the old mapping is already
/// dead.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    records: DashMap<String, UrlRecord>,
    /// Secondary index for sequential-scheme lookups: id → code.
    ids: DashMap<u64, String>,
}

impl InMemoryStore {
    /// Creates a new in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MappingStore for InMemoryStore {
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        Ok(self.records.get(code.as_str()).map(|r| r.value().clone()))
    }

    async fn get_by_id(&self, id: u64) -> Result<Option<UrlRecord>> {
        let Some(code) = self.ids.get(&id).map(|c| c.value().clone()) else {
            return Ok(None);
        };
        Ok(self.records.get(&code).map(|r| r.value().clone()))
    }

    async fn put(&self, record: UrlRecord) -> Result<()> {
        let key = record.short_code.as_str().to_owned();

        // Check-and-insert: reject if the code is already mapped by a live
        // record; an expired occupant is replaced.
        let existing = self.records.get(&key);
        if let Some(ref occupant) = existing {
            if !occupant.is_expired(Timestamp::now()) {
                return Err(StorageError::Conflict(key));
            }
            if let Some(old_id) = occupant.id {
                self.ids.remove(&old_id);
            }
            drop(existing);
        }

        if let Some(id) = record.id {
            self.ids.insert(id, key.clone());
        }
        self.records.insert(key, record);
        Ok(())
    }

    async fn delete(&self, code: &ShortCode) -> Result<bool> {
        let Some((_, record)) = self.records.remove(code.as_str()) else {
            return Ok(false);
        };
        if let Some(id) = record.id {
            self.ids.remove(&id);
        }
        Ok(true)
    }
}
