use async_trait::async_trait;
use dashmap::DashMap;
use jiff::{SignedDuration, Timestamp};
use snaplink_core::store::Result;
use snaplink_core::{ShortCode, StoreError, UrlStore};
use smol_str::SmolStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// In-memory storage entry for a URL mapping.
#[derive(Debug, Clone)]
struct Entry {
    url: String,
    expire_at: Timestamp,
}

impl Entry {
    fn is_expired_at(&self, now: Timestamp) -> bool {
        now >= self.expire_at
    }
}

/// In-memory [`UrlStore`] backed by a [`DashMap`].
///
/// Expired entries read as [`StoreError::NotFound`] and are dropped on
/// access; [`evict_expired`](Self::evict_expired) sweeps the rest. Clones
/// share the same map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUrlStore {
    storage: Arc<DashMap<SmolStr, Entry>>,
}

impl InMemoryUrlStore {
    /// Creates a new in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory store with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: Arc::new(DashMap::with_capacity(capacity)),
        }
    }

    /// Number of entries held, expired or not.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn evict_expired(&self) -> usize {
        let now = Timestamp::now();
        let before = self.storage.len();
        self.storage.retain(|_, entry| !entry.is_expired_at(now));
        before.saturating_sub(self.storage.len())
    }

    /// Runs [`evict_expired`](Self::evict_expired) every `period` on the
    /// current tokio runtime until the handle is aborted.
    pub fn spawn_sweeper(&self, period: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let evicted = store.evict_expired();
                if evicted > 0 {
                    debug!(evicted, remaining = store.len(), "evicted expired mappings");
                }
            }
        })
    }
}

fn expiry_after(ttl: Duration) -> Timestamp {
    SignedDuration::try_from(ttl)
        .ok()
        .and_then(|ttl| Timestamp::now().checked_add(ttl).ok())
        .unwrap_or(Timestamp::MAX)
}

#[async_trait]
impl UrlStore for InMemoryUrlStore {
    async fn put(&self, code: &ShortCode, url: &str, ttl: Duration) -> Result<()> {
        let entry = Entry {
            url: url.to_owned(),
            expire_at: expiry_after(ttl),
        };
        trace!(code = %code, expire_at = %entry.expire_at, "storing mapping in memory");
        self.storage.insert(SmolStr::new(code.as_str()), entry);
        Ok(())
    }

    async fn get(&self, code: &ShortCode) -> Result<String> {
        let key = code.as_str();
        let now = Timestamp::now();

        let Some(entry) = self.storage.get(key) else {
            return Err(StoreError::NotFound);
        };

        if entry.is_expired_at(now) {
            drop(entry);
            // A concurrent put may have refreshed the key in between.
            self.storage
                .remove_if(key, |_, entry| entry.is_expired_at(now));
            return Err(StoreError::NotFound);
        }

        Ok(entry.url.clone())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
