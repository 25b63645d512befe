//! Core types and traits for the snaplink URL shortener.
//!
//! This crate holds what the shortener and the redirector share: the
//! [`ShortCode`] key type, the [`UrlStore`] contract, the error taxonomy and
//! the redirect-time URL [`normalize`] step.

pub mod base58;
pub mod error;
pub mod normalize;
pub mod shortcode;
pub mod store;

pub use error::{GenerationError, StoreError, ValidationError};
pub use normalize::ensure_scheme;
pub use shortcode::ShortCode;
pub use store::{UrlStore, DEFAULT_TTL};
