//! The read path: resolve a short code to the URL a client is sent to.
//!
//! # Example
//!
//! ```rust
//! use snaplink_core::{ShortCode, UrlStore};
//! use snaplink_redirector::{Redirector, RedirectorService};
//! use snaplink_storage::InMemoryUrlStore;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryUrlStore::new();
//! store
//!     .put(&ShortCode::new_unchecked("abc123"), "example.com/page", Duration::from_secs(60))
//!     .await?;
//!
//! let service = RedirectorService::new(store);
//! let target = service.resolve("abc123").await?;
//! assert_eq!(target.as_str(), "http://example.com/page");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod redirector;
pub mod service;

pub use error::ResolveError;
pub use redirector::{RedirectTarget, Redirector};
pub use service::RedirectorService;
