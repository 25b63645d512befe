//! The write path: turn a long URL into a stored, expiring short URL.
//!
//! [`ShortenerService`] asks a [`Generator`](snaplink_generator::Generator)
//! for a code, writes the mapping to a [`UrlStore`](snaplink_core::UrlStore)
//! and composes the public short URL.

pub mod error;
pub mod service;
pub mod shortener;

pub use error::ShortenError;
pub use service::{ShortenerService, ShortenerSettings, DEFAULT_GENERATION_TIMEOUT};
pub use shortener::{ShortenRequest, ShortenedUrl, Shortener};
