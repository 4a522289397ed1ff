use crate::{Allocation, Allocator, AllocatorError};
use async_trait::async_trait;
use curtail_coordination::{
    CoordinationClient, CoordinationError, CoordinationService, NodeState,
};
use curtail_core::{base62, ShortCode};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Coordinated sequential allocator.
///
/// Ids come from the distributed counter, so uniqueness is strong across any
/// number of instances; codes are the base-62 encoding of the id and remain
/// decodable back to it. Sequential ids are never reused, so an expired
/// record's code stays retired under this scheme.
pub struct SequentialAllocator<S> {
    client: CoordinationClient<S>,
    counter_ready: AtomicBool,
}

impl<S: CoordinationService> SequentialAllocator<S> {
    pub fn new(client: CoordinationClient<S>) -> Self {
        Self {
            client,
            counter_ready: AtomicBool::new(false),
        }
    }

    /// Probes for the counter node on first use and creates it if absent.
    ///
    /// Seeding is not itself an allocation: the first `next_id` consumes the
    /// seed, so ids start exactly at the configured initial value and no id
    /// is ever issued twice. A racing instance may create the node between
    /// the probe and the create; losing that race is fine.
    async fn ensure_counter(&self) -> Result<(), CoordinationError> {
        if self.counter_ready.load(Ordering::Acquire) {
            return Ok(());
        }

        match self.client.counter_exists().await? {
            NodeState::Exists => {}
            NodeState::Absent => match self.client.create_counter().await {
                Ok(()) => {
                    info!(
                        path = self.client.counter_path(),
                        seed = self.client.initial_value(),
                        "seeded counter node"
                    );
                }
                Err(CoordinationError::AlreadyExists(_)) => {}
                Err(err) => return Err(err),
            },
        }

        self.counter_ready.store(true, Ordering::Release);
        Ok(())
    }
}

#[async_trait]
impl<S: CoordinationService> Allocator for SequentialAllocator<S> {
    async fn allocate(&self, _long_url: &str) -> Result<Allocation, AllocatorError> {
        self.ensure_counter().await?;
        let id = self.client.next_id().await?;
        let code = ShortCode::new_unchecked(base62::encode(id));
        debug!(id, code = %code, "allocated sequential code");
        Ok(Allocation { id: Some(id), code })
    }
}
