//! Session-based client for the distributed counter.
//!
//! The coordination service is an external strongly-consistent store used
//! here solely as a monotonically increasing counter. This crate defines the
//! wire boundary ([`CoordinationService`]), the session lifecycle state
//! machine, the counter client ([`CoordinationClient`]), and an in-process
//! simulation backend ([`InMemoryCoordination`]).

mod client;
pub mod error;
mod memory;
mod service;
mod session;

pub use client::{CoordinationClient, CounterSettings};
pub use error::{CoordinationError, Result};
pub use memory::InMemoryCoordination;
pub use service::{CoordinationService, NodeState, SessionId, VersionedValue};
pub use session::SessionState;
