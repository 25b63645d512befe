use crate::base58::ShortCodeBase58;
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt::Display;

/// The lookup key for a stored URL.
///
/// Codes are produced by a generator on the write path. On the read path any
/// non-empty string is accepted: a code the generator never produced is a
/// lookup miss, not a malformed request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortCode(SmolStr);

impl ShortCode {
    /// Creates a `ShortCode` from generator output.
    ///
    /// ```
    /// use snaplink_core::base58::ShortCodeBase58;
    /// use snaplink_core::ShortCode;
    ///
    /// let code = ShortCode::generated(ShortCodeBase58::new([1, 2, 3, 4, 5, 6]));
    /// assert!(!code.as_str().is_empty());
    /// ```
    pub fn generated(code: impl Into<ShortCodeBase58>) -> Self {
        Self(SmolStr::new(code.into().as_str()))
    }

    /// Parses a code received from a client.
    pub fn parse(code: &str) -> Result<Self, ValidationError> {
        if code.is_empty() {
            return Err(ValidationError::MissingShortCode);
        }
        Ok(Self(SmolStr::new(code)))
    }

    /// Creates a `ShortCode` without validation.
    ///
    /// Use this only for codes produced by trusted internal sources.
    pub fn new_unchecked(code: impl AsRef<str>) -> Self {
        Self(SmolStr::new(code))
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<ShortCodeBase58> for ShortCode {
    fn from(code: ShortCodeBase58) -> Self {
        Self::generated(code)
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_empty() {
        assert_eq!(ShortCode::parse(""), Err(ValidationError::MissingShortCode));
    }

    #[test]
    fn parse_accepts_anything_else() {
        assert_eq!(ShortCode::parse("abc123").unwrap().as_str(), "abc123");
        assert_eq!(ShortCode::parse("not/a/code").unwrap().as_str(), "not/a/code");
    }

    #[test]
    fn generated_matches_base58_text() {
        let base58 = ShortCodeBase58::new([9, 8, 7, 6, 5, 4]);
        let code = ShortCode::generated(base58.clone());
        assert_eq!(code.as_str(), base58.as_str());
        assert_eq!(code.to_string(), base58.to_string());
    }

    #[test]
    fn to_url_trims_trailing_slash() {
        let code = ShortCode::new_unchecked("abc123");
        assert_eq!(code.to_url("http://localhost:3000"), "http://localhost:3000/abc123");
        assert_eq!(code.to_url("http://localhost:3000/"), "http://localhost:3000/abc123");
    }
}
