use std::sync::Arc;

use snaplink_core::UrlStore;
use snaplink_redirector::Redirector;
use snaplink_shortener::Shortener;

#[derive(Clone)]
pub struct AppState {
    shortener: Arc<dyn Shortener>,
    redirector: Arc<dyn Redirector>,
    store: Arc<dyn UrlStore>,
}

impl AppState {
    pub fn new(
        shortener: Arc<dyn Shortener>,
        redirector: Arc<dyn Redirector>,
        store: Arc<dyn UrlStore>,
    ) -> Self {
        Self {
            shortener,
            redirector,
            store,
        }
    }

    pub fn shortener(&self) -> &dyn Shortener {
        self.shortener.as_ref()
    }

    pub fn redirector(&self) -> &dyn Redirector {
        self.redirector.as_ref()
    }

    /// The store the services write to, used directly only for health probes.
    pub fn store(&self) -> &dyn UrlStore {
        self.store.as_ref()
    }
}
