use std::time::Duration;
use thiserror::Error;

/// Type alias for coordination results.
pub type Result<T> = std::result::Result<T, CoordinationError>;

/// Errors returned by the coordination wire boundary and counter client.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoordinationError {
    #[error("coordination service unreachable: {0}")]
    Unreachable(String),
    #[error("coordination session expired")]
    SessionExpired,
    #[error("node already exists: {0}")]
    AlreadyExists(String),
    #[error("node not found: {0}")]
    NotFound(String),
    #[error("conditional write lost: expected version {expected}, found {actual}")]
    VersionConflict { expected: i64, actual: i64 },
    #[error("counter value is not a base-10 integer: {0:?}")]
    InvalidValue(String),
    #[error("coordination operation timed out after {0:?}")]
    Timeout(Duration),
}
