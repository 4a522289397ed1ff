use crate::error::{CoordinationError, Result};
use crate::service::{CoordinationService, NodeState, SessionId};
use crate::session::SessionState;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, trace, warn};
use typed_builder::TypedBuilder;

pub const DEFAULT_COUNTER_PATH: &str = "/counter";
pub const DEFAULT_INITIAL_COUNTER: &str = "100000000000";
const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(3);

/// Configures a [`CoordinationClient`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct CounterSettings {
    /// Path of the counter node.
    #[builder(default = String::from(DEFAULT_COUNTER_PATH), setter(into))]
    pub counter_path: String,
    /// Numeral string seeded into the counter node on creation.
    #[builder(default = String::from(DEFAULT_INITIAL_COUNTER), setter(into))]
    pub initial_value: String,
    /// Upper bound on a single counter operation, session handshake included.
    #[builder(default = DEFAULT_OP_TIMEOUT)]
    pub op_timeout: Duration,
}

impl Default for CounterSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Debug)]
struct SessionSlot {
    state: SessionState,
    id: Option<SessionId>,
}

/// Session-bound client for the distributed counter.
///
/// Owns the session lifecycle state machine and the allocation contract:
/// `next_id` hands out the pre-increment counter value, made atomic across
/// any number of concurrent instances by the service's expected-version
/// conditional write. No in-process lock is relied on for cross-instance
/// correctness; the internal mutex only serializes this client's own session
/// bookkeeping.
pub struct CoordinationClient<S> {
    service: Arc<S>,
    settings: CounterSettings,
    slot: Mutex<SessionSlot>,
}

impl<S: CoordinationService> CoordinationClient<S> {
    pub fn new(service: S, settings: CounterSettings) -> Self {
        Self {
            service: Arc::new(service),
            settings,
            slot: Mutex::new(SessionSlot {
                state: SessionState::Disconnected,
                id: None,
            }),
        }
    }

    /// Path of the counter node this client operates on.
    pub fn counter_path(&self) -> &str {
        &self.settings.counter_path
    }

    /// Numeral string the counter node is seeded with on creation.
    pub fn initial_value(&self) -> &str {
        &self.settings.initial_value
    }

    /// Current session lifecycle state.
    pub async fn state(&self) -> SessionState {
        self.slot.lock().await.state
    }

    /// Establishes a session with the coordination service.
    ///
    /// Safe to call at any time: already-connected clients return
    /// immediately, and a client whose previous session expired or dropped
    /// starts a fresh handshake.
    pub async fn connect(&self) -> Result<()> {
        let mut slot = self.slot.lock().await;
        self.connect_locked(&mut slot).await.map(|_| ())
    }

    async fn connect_locked(&self, slot: &mut SessionSlot) -> Result<SessionId> {
        if let (SessionState::Connected, Some(id)) = (slot.state, slot.id) {
            return Ok(id);
        }
        slot.state = SessionState::Connecting;
        slot.id = None;
        match self.service.open_session().await {
            Ok(id) => {
                slot.state = SessionState::Connected;
                slot.id = Some(id);
                info!(session = id.0, "coordination session established");
                Ok(id)
            }
            Err(err) => {
                slot.state = SessionState::Disconnected;
                Err(err)
            }
        }
    }

    /// Closes the current session, if any, and rests `Disconnected`.
    ///
    /// The session id is relinquished before the wire call resolves, so even
    /// a failed close leaves nothing half-open. Safe to call on an
    /// already-disconnected client.
    pub async fn close(&self) -> Result<()> {
        let mut slot = self.slot.lock().await;
        let result = match slot.id.take() {
            Some(id) => self.service.close_session(id).await,
            None => Ok(()),
        };
        slot.state = SessionState::Disconnected;
        result
    }

    async fn ensure_session(&self) -> Result<SessionId> {
        let mut slot = self.slot.lock().await;
        self.connect_locked(&mut slot).await
    }

    /// Tears down session state after a failed operation. A session declared
    /// expired by the service is closed and the client rests in `Expired`; a
    /// transient failure rests in `Disconnected`. Either way the next
    /// operation performs a fresh handshake, so no half-open session is ever
    /// carried forward.
    async fn demote(&self, err: &CoordinationError) {
        match err {
            CoordinationError::SessionExpired => {
                let mut slot = self.slot.lock().await;
                if let Some(id) = slot.id.take() {
                    if let Err(close_err) = self.service.close_session(id).await {
                        warn!(error = %close_err, "failed to close expired session");
                    }
                }
                slot.state = SessionState::Expired;
                debug!("coordination session expired; will reconnect on next use");
            }
            CoordinationError::Unreachable(_) | CoordinationError::Timeout(_) => {
                let mut slot = self.slot.lock().await;
                slot.id = None;
                slot.state = SessionState::Disconnected;
                debug!("coordination session dropped; will reconnect on next use");
            }
            _ => {}
        }
    }

    /// Probes whether the counter node exists.
    pub async fn counter_exists(&self) -> Result<NodeState> {
        let session = self.ensure_session().await?;
        let result = self
            .service
            .exists(session, &self.settings.counter_path)
            .await;
        if let Err(ref err) = result {
            self.demote(err).await;
        }
        result
    }

    /// Creates the counter node seeded with the configured initial numeral.
    pub async fn create_counter(&self) -> Result<()> {
        let session = self.ensure_session().await?;
        let result = self
            .service
            .create(
                session,
                &self.settings.counter_path,
                &self.settings.initial_value,
            )
            .await;
        if let Err(ref err) = result {
            self.demote(err).await;
        }
        result
    }

    /// Atomically allocates the next counter value.
    ///
    /// Reads the current value, conditionally writes `value + 1` at the
    /// version the read observed, and returns the pre-increment value: ids
    /// are issued starting at the seed and increase by exactly one per call.
    /// A lost conditional write means another instance allocated in between;
    /// the loop re-reads and tries again. The whole operation is bounded by
    /// the configured timeout, and the conditional write keeps an
    /// interrupted allocation all-or-nothing.
    pub async fn next_id(&self) -> Result<u64> {
        let session = self.ensure_session().await?;
        let path = self.settings.counter_path.as_str();

        let attempt = async {
            loop {
                let current = self.service.read(session, path).await?;
                let value: u64 = current
                    .value
                    .trim()
                    .parse()
                    .map_err(|_| CoordinationError::InvalidValue(current.value.clone()))?;
                let next = value
                    .checked_add(1)
                    .ok_or_else(|| CoordinationError::InvalidValue(current.value.clone()))?;

                match self
                    .service
                    .write(session, path, &next.to_string(), current.version)
                    .await
                {
                    Ok(()) => return Ok(value),
                    Err(CoordinationError::VersionConflict { .. }) => {
                        trace!(path, value, "conditional write lost the race; re-reading");
                        continue;
                    }
                    Err(err) => return Err(err),
                }
            }
        };

        let result = match tokio::time::timeout(self.settings.op_timeout, attempt).await {
            Ok(result) => result,
            Err(_) => Err(CoordinationError::Timeout(self.settings.op_timeout)),
        };
        if let Err(ref err) = result {
            self.demote(err).await;
        }
        result
    }
}
