//! Short-code allocation strategies.
//!
//! Allocation is a single pluggable capability with two conforming
//! implementations whose concurrency guarantees differ fundamentally:
//! [`SequentialAllocator`] draws coordinated, strongly unique counter values;
//! [`RandomAllocator`] derives candidates independently and retries a bounded
//! number of times on collision. They are never hybridized; the composition
//! root picks one.

pub mod error;
pub mod random;
pub mod sequential;

pub use error::AllocatorError;
pub use random::{RandomAllocator, RandomSettings};
pub use sequential::SequentialAllocator;

use async_trait::async_trait;
use curtail_core::ShortCode;

/// A newly allocated short code, along with the counter id that backs it
/// under the sequential scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    /// Counter id for sequential codes; `None` for randomized codes, where
    /// the code itself is the key.
    pub id: Option<u64>,
    pub code: ShortCode,
}

/// Produces unique short codes for new mappings.
#[async_trait]
pub trait Allocator: Send + Sync + 'static {
    /// Allocates a code for the given long URL.
    ///
    /// The URL is an input to the randomized scheme's candidate derivation;
    /// the sequential scheme ignores it.
    async fn allocate(&self, long_url: &str) -> Result<Allocation, AllocatorError>;
}
