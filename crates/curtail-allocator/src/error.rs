use curtail_core::StorageError;
use curtail_coordination::CoordinationError;
use thiserror::Error;

/// Errors from short-code allocation.
#[derive(Debug, Clone, Error)]
pub enum AllocatorError {
    /// The coordination service failed or the counter write did not take
    /// effect. Fatal to the current request; never retried automatically.
    #[error("coordination failure: {0}")]
    Coordination(#[from] CoordinationError),
    /// The uniqueness probe against the mapping store failed.
    #[error("uniqueness probe failed: {0}")]
    Probe(#[from] StorageError),
    /// The system randomness source failed.
    #[error("random source failure: {0}")]
    Randomness(String),
    /// Every probe attempt within the retry limit collided. A conflict,
    /// not a hard failure: the caller may retry the whole request later.
    #[error("no free code after {attempts} attempts")]
    Exhausted { attempts: u32 },
}
