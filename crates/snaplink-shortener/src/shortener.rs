use crate::error::ShortenError;
use async_trait::async_trait;
use jiff::Timestamp;
use snaplink_core::ShortCode;

/// Parameters for creating a shortened URL.
#[derive(Debug, Clone)]
pub struct ShortenRequest {
    /// The original URL. Stored verbatim, no normalization.
    pub url: String,
}

impl ShortenRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// A mapping that was just written.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortenedUrl {
    pub code: ShortCode,
    /// `<public-base>/<code>`.
    pub short_url: String,
    /// When the store will drop the mapping.
    pub expire_at: Timestamp,
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Creates a shortened URL for `request.url`.
    async fn shorten(&self, request: ShortenRequest) -> Result<ShortenedUrl, ShortenError>;
}
