//! [`UrlStore`] backends: Redis for deployments, an in-memory map for local
//! runs and tests.

pub mod memory;
pub mod redis;

pub use memory::InMemoryUrlStore;
pub use self::redis::{RedisSettings, RedisUrlStore};
pub use snaplink_core::{StoreError, UrlStore};
