use thiserror::Error;

/// Errors from the base-62 codec.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("symbol outside the base-62 alphabet: {symbol:?}")]
    InvalidSymbol { symbol: char },
    #[error("decoded value exceeds the 64-bit ceiling")]
    Overflow,
    #[error("short code is empty")]
    Empty,
}

/// Errors from the durable mapping store.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("short code already mapped: {0}")]
    Conflict(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

/// Errors from the resolution cache.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
    #[error("cache operation timed out: {0}")]
    Timeout(String),
    #[error("cache operation failed: {0}")]
    Operation(String),
}
