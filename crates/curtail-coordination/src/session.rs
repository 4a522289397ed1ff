/// Session lifecycle states for the coordination client.
///
/// Transitions: `Disconnected → Connecting → Connected`, then back to
/// `Disconnected` on transient failure or to `Expired` when the service
/// declares the session dead. Both resting states require a fresh
/// `connect()` before further counter operations; no session identity is
/// carried across either transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Connected,
    Expired,
}

impl SessionState {
    /// Whether counter operations may proceed without re-connecting.
    pub fn is_connected(self) -> bool {
        matches!(self, SessionState::Connected)
    }
}
