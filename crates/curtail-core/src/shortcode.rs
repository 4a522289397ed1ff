use crate::base62;
use crate::error::CodecError;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt::Display;

/// A validated short code identifier for a shortened URL.
///
/// Short codes contain only symbols from the base-62 alphabet, whether they
/// come from the sequential scheme (an encoded counter value) or the
/// randomized scheme (a filtered digest).
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShortCode(SmolStr);

impl ShortCode {
    /// Creates a `ShortCode` after validating every symbol against the
    /// code alphabet.
    pub fn parse(code: impl AsRef<str>) -> Result<Self, CodecError> {
        let code = code.as_ref();
        if code.is_empty() {
            return Err(CodecError::Empty);
        }
        for symbol in code.chars() {
            if !base62::contains(symbol) {
                return Err(CodecError::InvalidSymbol { symbol });
            }
        }
        Ok(Self(SmolStr::new(code)))
    }

    /// Creates a `ShortCode` without validation.
    ///
    /// Use this only for codes produced by trusted internal sources
    /// (the allocators are guaranteed to emit alphabet-only output).
    pub fn new_unchecked(code: impl Into<SmolStr>) -> Self {
        Self(code.into())
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self)
    }
}

impl std::fmt::Debug for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ShortCode").field(&self.0).finish()
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
