use crate::error::Result;
use async_trait::async_trait;

/// Opaque handle to an established coordination session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub u64);

/// A node's value together with the version the read observed.
///
/// The version feeds the conditional write: a writer presents the version it
/// read, and the service rejects the write if the node has moved since.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedValue {
    pub value: String,
    pub version: i64,
}

/// Outcome of an existence probe.
///
/// Absence and protocol failure are deliberately distinct: a probe that
/// cannot reach the service returns `Err`, never `Absent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Exists,
    Absent,
}

/// Wire boundary to the external strongly-consistent coordination service.
///
/// Sessions gate every node operation: a request carrying a dead session id
/// fails with `SessionExpired`, which the client reacts to by tearing down
/// and lazily re-establishing its session.
#[async_trait]
pub trait CoordinationService: Send + Sync + 'static {
    /// Performs the session handshake, returning once the session is
    /// confirmed established.
    async fn open_session(&self) -> Result<SessionId>;

    /// Releases a session. Closing an already-dead session is not an error.
    async fn close_session(&self, session: SessionId) -> Result<()>;

    /// Probes whether a node exists.
    async fn exists(&self, session: SessionId, path: &str) -> Result<NodeState>;

    /// Creates a persistent node holding `value`.
    /// Fails with `AlreadyExists` if the path is taken.
    async fn create(&self, session: SessionId, path: &str, value: &str) -> Result<()>;

    /// Reads a node's value and current version.
    async fn read(&self, session: SessionId, path: &str) -> Result<VersionedValue>;

    /// Writes `value` only if the node's version still equals
    /// `expected_version`; fails with `VersionConflict` otherwise.
    async fn write(
        &self,
        session: SessionId,
        path: &str,
        value: &str,
        expected_version: i64,
    ) -> Result<()>;
}
