use snaplink_core::{GenerationError, StoreError, ValidationError};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ShortenError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("unable to generate short url: {0}")]
    Generation(#[source] GenerationError),
    #[error("unable to store short url: {0}")]
    Store(#[source] StoreError),
}

impl From<GenerationError> for ShortenError {
    fn from(value: GenerationError) -> Self {
        Self::Generation(value)
    }
}

impl From<StoreError> for ShortenError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}
