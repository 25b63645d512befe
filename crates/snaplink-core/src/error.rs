use thiserror::Error;

/// Malformed or missing client input. Always reported back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("url is missing")]
    MissingUrl,
    #[error("short code is missing")]
    MissingShortCode,
    #[error("malformed request body: {0}")]
    MalformedBody(String),
}

/// The code generator could not produce an id.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("id source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("id space exhausted: {0}")]
    Exhausted(String),
}

/// Errors reported by a [`UrlStore`](crate::UrlStore).
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The key is absent or its TTL elapsed.
    #[error("short code not found")]
    NotFound,
    #[error("store backend unavailable: {0}")]
    Unavailable(String),
    #[error("store operation timed out: {0}")]
    Timeout(String),
    #[error("stored value is invalid: {0}")]
    InvalidData(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }
}
