use crate::shortcode::ShortCode;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A stored short-to-long URL mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlRecord {
    /// Allocator-assigned integer id under the sequential scheme.
    /// Absent under the randomized scheme, where the code itself is the key.
    pub id: Option<u64>,
    /// The normalized absolute URL that was shortened.
    pub long_url: String,
    /// The unique short code mapped to `long_url`.
    pub short_code: ShortCode,
    /// When the record was created.
    pub created_at: Timestamp,
    /// When the record expires. Expired records are removed lazily on read.
    pub expires_at: Timestamp,
    /// Source address of the request that created the record. Diagnostic only.
    pub source_ip: Option<String>,
}

impl UrlRecord {
    /// Returns whether the record has expired as of `now`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.expires_at
    }
}
