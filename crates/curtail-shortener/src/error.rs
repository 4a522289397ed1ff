use curtail_allocator::AllocatorError;
use curtail_core::StorageError;
use thiserror::Error;

/// Type alias for service results.
pub type Result<T> = std::result::Result<T, ShortenerError>;

/// Errors surfaced to callers of the shortener service.
#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    /// Malformed or over-length input URL; the request is rejected.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    /// Code allocation failed hard (coordination or probe failure).
    #[error("code allocation failed: {0}")]
    AllocationFailed(AllocatorError),
    /// The randomized scheme ran out of retry attempts. A conflict rather
    /// than a hard failure; the whole request may be retried later.
    #[error("no free code after {attempts} attempts")]
    AllocationExhausted { attempts: u32 },
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<AllocatorError> for ShortenerError {
    fn from(value: AllocatorError) -> Self {
        match value {
            AllocatorError::Exhausted { attempts } => Self::AllocationExhausted { attempts },
            other => Self::AllocationFailed(other),
        }
    }
}
