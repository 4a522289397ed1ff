use crate::error::{CoordinationError, Result};
use crate::service::{CoordinationService, NodeState, SessionId, VersionedValue};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Inner {
    nodes: HashMap<String, VersionedValue>,
    live_sessions: HashSet<u64>,
    next_session: u64,
    unreachable: bool,
}

/// In-process simulation of the coordination service.
///
/// Implements the full wire contract (session handshake, three-way existence,
/// versioned conditional writes) so it can stand in for the external service
/// in tests and single-node deployments. Clones share state, which lets
/// multiple clients coordinate through one simulated service.
///
/// Fault injection: [`expire_sessions`](Self::expire_sessions) kills every
/// live session, [`set_unreachable`](Self::set_unreachable) simulates a
/// network partition.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCoordination {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryCoordination {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares every live session expired, as the service would after a
    /// missed heartbeat window.
    pub fn expire_sessions(&self) {
        self.inner.lock().live_sessions.clear();
    }

    /// Simulates (or heals) a network partition between clients and the
    /// service.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.inner.lock().unreachable = unreachable;
    }

    fn check_session(inner: &Inner, session: SessionId) -> Result<()> {
        if inner.unreachable {
            return Err(CoordinationError::Unreachable(
                "simulated partition".to_string(),
            ));
        }
        if !inner.live_sessions.contains(&session.0) {
            return Err(CoordinationError::SessionExpired);
        }
        Ok(())
    }
}

#[async_trait]
impl CoordinationService for InMemoryCoordination {
    async fn open_session(&self) -> Result<SessionId> {
        let mut inner = self.inner.lock();
        if inner.unreachable {
            return Err(CoordinationError::Unreachable(
                "simulated partition".to_string(),
            ));
        }
        let id = inner.next_session;
        inner.next_session += 1;
        inner.live_sessions.insert(id);
        Ok(SessionId(id))
    }

    async fn close_session(&self, session: SessionId) -> Result<()> {
        self.inner.lock().live_sessions.remove(&session.0);
        Ok(())
    }

    async fn exists(&self, session: SessionId, path: &str) -> Result<NodeState> {
        let inner = self.inner.lock();
        Self::check_session(&inner, session)?;
        Ok(if inner.nodes.contains_key(path) {
            NodeState::Exists
        } else {
            NodeState::Absent
        })
    }

    async fn create(&self, session: SessionId, path: &str, value: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        Self::check_session(&inner, session)?;
        if inner.nodes.contains_key(path) {
            return Err(CoordinationError::AlreadyExists(path.to_string()));
        }
        inner.nodes.insert(
            path.to_string(),
            VersionedValue {
                value: value.to_string(),
                version: 0,
            },
        );
        Ok(())
    }

    async fn read(&self, session: SessionId, path: &str) -> Result<VersionedValue> {
        let inner = self.inner.lock();
        Self::check_session(&inner, session)?;
        inner
            .nodes
            .get(path)
            .cloned()
            .ok_or_else(|| CoordinationError::NotFound(path.to_string()))
    }

    async fn write(
        &self,
        session: SessionId,
        path: &str,
        value: &str,
        expected_version: i64,
    ) -> Result<()> {
        let mut inner = self.inner.lock();
        Self::check_session(&inner, session)?;
        let node = inner
            .nodes
            .get_mut(path)
            .ok_or_else(|| CoordinationError::NotFound(path.to_string()))?;
        if node.version != expected_version {
            return Err(CoordinationError::VersionConflict {
                expected: expected_version,
                actual: node.version,
            });
        }
        node.value = value.to_string();
        node.version += 1;
        Ok(())
    }
}
