use crate::error::ResolveError;
use async_trait::async_trait;
use std::fmt::Display;

/// Where a client should be redirected. Always carries an explicit scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget(String);

impl RedirectTarget {
    pub(crate) fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for RedirectTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[async_trait]
pub trait Redirector: Send + Sync + 'static {
    /// Resolves a client-supplied short code to its redirect target.
    async fn resolve(&self, code: &str) -> Result<RedirectTarget, ResolveError>;
}
