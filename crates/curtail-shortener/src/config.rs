use jiff::SignedDuration;
use typed_builder::TypedBuilder;

pub const DEFAULT_MAX_URL_LEN: usize = 100;
pub const DEFAULT_RECORD_TTL: SignedDuration = SignedDuration::from_hours(24 * 30);

/// Policy knobs for the shortener service.
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct ShortenerConfig {
    /// Maximum accepted length of a raw input URL, in bytes.
    #[builder(default = DEFAULT_MAX_URL_LEN)]
    pub max_url_len: usize,
    /// How long a new mapping lives before lazy expiration removes it.
    #[builder(default = DEFAULT_RECORD_TTL)]
    pub record_ttl: SignedDuration,
}

impl Default for ShortenerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
