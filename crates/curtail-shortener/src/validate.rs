use crate::error::ShortenerError;
use tracing::trace;
use url::Url;

const HTTP_SCHEME: &str = "http://";
const HTTPS_SCHEME: &str = "https://";

/// Validates a raw input URL and returns the normalized form to store.
///
/// The raw input is length-bounded before anything else. Inputs without an
/// explicit http(s) scheme get `https://` prefixed, and the result must
/// parse as an absolute http(s) URL with a host. The prefixed original
/// spelling is what gets stored, so a bare host like `example.com` becomes
/// exactly `https://example.com`.
pub fn normalize_url(raw: &str, max_len: usize) -> Result<String, ShortenerError> {
    if raw.is_empty() {
        return Err(ShortenerError::InvalidUrl("url is empty".to_string()));
    }
    if raw.len() > max_len {
        return Err(ShortenerError::InvalidUrl(format!(
            "url exceeds {max_len} characters"
        )));
    }

    let candidate = if raw.starts_with(HTTP_SCHEME) || raw.starts_with(HTTPS_SCHEME) {
        raw.to_string()
    } else {
        format!("{HTTPS_SCHEME}{raw}")
    };

    let parsed = Url::parse(&candidate)
        .map_err(|err| ShortenerError::InvalidUrl(format!("{candidate}: {err}")))?;
    if !parsed.has_host() {
        return Err(ShortenerError::InvalidUrl(format!(
            "url has no host: {candidate}"
        )));
    }

    trace!(url = %candidate, "validated input url");
    Ok(candidate)
}
