use std::sync::Arc;

use crate::error::ResolveError;
use crate::redirector::{RedirectTarget, Redirector};
use async_trait::async_trait;
use snaplink_core::{ensure_scheme, ShortCode, StoreError, UrlStore};
use tracing::{debug, trace, warn};

/// Service for handling URL redirects.
///
/// Looks the code up in the store on every call and normalizes the stored
/// URL only here, right before it becomes a redirect target.
#[derive(Debug)]
pub struct RedirectorService<S> {
    store: Arc<S>,
}

impl<S> Clone for RedirectorService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: UrlStore> RedirectorService<S> {
    /// Creates a new RedirectorService with the given store.
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

#[async_trait]
impl<S: UrlStore> Redirector for RedirectorService<S> {
    async fn resolve(&self, code: &str) -> Result<RedirectTarget, ResolveError> {
        let code = ShortCode::parse(code)?;
        trace!(code = %code, "resolving short code");

        match self.store.get(&code).await {
            Ok(url) => {
                let target = RedirectTarget::new(ensure_scheme(&url));
                debug!(code = %code, target = %target, "resolved short code");
                Ok(target)
            }
            Err(StoreError::NotFound) => {
                debug!(code = %code, "short code not found");
                Err(ResolveError::NotFound(code))
            }
            Err(e) => {
                warn!(code = %code, error = %e, "store lookup failed");
                Err(ResolveError::Backend(e))
            }
        }
    }
}
