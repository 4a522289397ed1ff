use crate::{Allocation, Allocator, AllocatorError};
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use curtail_core::{MappingStore, ShortCode};
use jiff::Timestamp;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

pub const DEFAULT_CODE_WIDTH: usize = 7;
pub const DEFAULT_RETRY_LIMIT: u32 = 3;

/// Configures a [`RandomAllocator`].
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct RandomSettings {
    /// Number of symbols in a generated code.
    #[builder(default = DEFAULT_CODE_WIDTH)]
    pub code_width: usize,
    /// Maximum uniqueness-probe attempts before reporting exhaustion.
    #[builder(default = DEFAULT_RETRY_LIMIT)]
    pub retry_limit: u32,
}

impl Default for RandomSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Uncoordinated randomized allocator.
///
/// Each instance derives candidate codes independently, with no shared state,
/// and probes the mapping store for uniqueness, retrying a bounded number of
/// times on collision. Horizontal scaling costs a bounded per-attempt
/// collision probability instead of a coordination dependency. Because an
/// expired record vanishes from the store, its code becomes allocatable
/// again under this scheme.
pub struct RandomAllocator<S> {
    store: Arc<S>,
    settings: RandomSettings,
}

impl<S: MappingStore> RandomAllocator<S> {
    pub fn new(store: Arc<S>, settings: RandomSettings) -> Self {
        Self { store, settings }
    }

    /// Derives one candidate: cryptographically strong random bytes mixed
    /// with a nanosecond timestamp and the target URL through SHA-256, the
    /// digest encoded as URL-safe base64 and filtered to the code alphabet.
    ///
    /// The filtering policy is fixed: the two non-alphanumeric base64
    /// symbols (`-` and `_`) are dropped before truncating to the code
    /// width. A digest left too short by filtering triggers a redraw;
    /// redraws never consume probe attempts.
    fn derive_candidate(&self, long_url: &str) -> Result<ShortCode, AllocatorError> {
        loop {
            let mut seed = [0u8; 16];
            getrandom::fill(&mut seed)
                .map_err(|err| AllocatorError::Randomness(err.to_string()))?;

            let mut hasher = Sha256::new();
            hasher.update(seed);
            hasher.update(Timestamp::now().as_nanosecond().to_be_bytes());
            hasher.update(long_url.as_bytes());
            let digest = hasher.finalize();

            let candidate: String = URL_SAFE_NO_PAD
                .encode(digest)
                .chars()
                .filter(char::is_ascii_alphanumeric)
                .take(self.settings.code_width)
                .collect();

            if candidate.len() == self.settings.code_width {
                return Ok(ShortCode::new_unchecked(candidate));
            }
            trace!("digest too short after filtering; redrawing");
        }
    }
}

#[async_trait]
impl<S: MappingStore> Allocator for RandomAllocator<S> {
    async fn allocate(&self, long_url: &str) -> Result<Allocation, AllocatorError> {
        for attempt in 1..=self.settings.retry_limit {
            let candidate = self.derive_candidate(long_url)?;

            // "Not found" means the code is free to claim.
            if self.store.get(&candidate).await?.is_none() {
                debug!(code = %candidate, attempt, "allocated random code");
                return Ok(Allocation {
                    id: None,
                    code: candidate,
                });
            }
            trace!(code = %candidate, attempt, "candidate collided");
        }

        Err(AllocatorError::Exhausted {
            attempts: self.settings.retry_limit,
        })
    }
}
