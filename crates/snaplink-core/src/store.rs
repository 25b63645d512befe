use crate::error::StoreError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Retention window applied when nothing else is configured.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// A key-value store for `code -> long url` mappings with expiry.
///
/// The backend owns expiry: once the TTL elapses the key reads as
/// [`StoreError::NotFound`], never as a stale value. Every call is a single
/// round-trip with no client-side caching.
#[async_trait]
pub trait UrlStore: Send + Sync + 'static {
    /// Upserts the mapping so that it expires `ttl` from now.
    ///
    /// Writing an existing code replaces its value and restarts its TTL.
    async fn put(&self, code: &ShortCode, url: &str, ttl: Duration) -> Result<()>;

    /// Returns the stored url, or [`StoreError::NotFound`] if the code is
    /// absent or expired.
    async fn get(&self, code: &ShortCode) -> Result<String>;

    /// Checks that the backend is reachable.
    async fn ping(&self) -> Result<()>;
}

#[async_trait]
impl<S: UrlStore + ?Sized> UrlStore for Arc<S> {
    async fn put(&self, code: &ShortCode, url: &str, ttl: Duration) -> Result<()> {
        (**self).put(code, url, ttl).await
    }

    async fn get(&self, code: &ShortCode) -> Result<String> {
        (**self).get(code).await
    }

    async fn ping(&self) -> Result<()> {
        (**self).ping().await
    }
}
