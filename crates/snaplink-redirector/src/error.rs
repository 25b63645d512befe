use snaplink_core::{ShortCode, StoreError, ValidationError};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The code never existed or its mapping expired.
    #[error("short url not found: {0}")]
    NotFound(ShortCode),
    #[error("error while getting url from store: {0}")]
    Backend(#[source] StoreError),
}
