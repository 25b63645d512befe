//! Short code generators.

pub mod obfuscated;

pub use obfuscated::{ObfuscatedTinyflake, Obfuscator};

use snaplink_core::{GenerationError, ShortCode};
use snaplink_tinyflake::{Clock, Tinyflake};

/// Trait for generating short codes.
///
/// Implementations are pure generators that don't interact with storage.
/// Uniqueness is the generator's job: callers store the code without
/// checking for an existing mapping.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<ShortCode> + Send + 'static;

    /// Generates a value that converts into a globally unique short code.
    fn generate(&self) -> Result<Self::Output, GenerationError>;
}

impl<C: Clock + 'static> Generator for Tinyflake<C> {
    type Output = ShortCode;

    fn generate(&self) -> Result<Self::Output, GenerationError> {
        let id = self.next_id().map_err(into_generation_error)?;
        Ok(ShortCode::generated(id))
    }
}

pub(crate) fn into_generation_error(err: snaplink_tinyflake::Error) -> GenerationError {
    use snaplink_tinyflake::Error;

    tracing::error!(error = %err, "tinyflake failed to produce an id");
    match err {
        Error::OverTimeLimit { .. } => GenerationError::Exhausted(err.to_string()),
        Error::InvalidNodeId { .. }
        | Error::EpochAhead { .. }
        | Error::ClockMovedBackward { .. }
        | Error::StatePoisoned => GenerationError::SourceUnavailable(err.to_string()),
    }
}
