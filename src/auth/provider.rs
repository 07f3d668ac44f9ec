//! Cached bearer token
//!
//! Lazily asks a [`TokenSource`] for a token and keeps it in memory until
//! [`AuthTokenProvider::invalidate`] is called.

use super::source::TokenSource;
use crate::error::Result;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Owns the bearer token for one client instance
///
/// Concurrent callers may both see an empty cache and both load; the last
/// write wins. Invalidation is a plain overwrite with `None`.
#[derive(Clone)]
pub struct AuthTokenProvider {
    source: Arc<dyn TokenSource>,
    cached_token: Arc<RwLock<Option<String>>>,
}

impl AuthTokenProvider {
    /// Create a provider backed by the given source
    pub fn new(source: impl TokenSource + 'static) -> Self {
        Self::from_arc(Arc::new(source))
    }

    /// Create a provider from a shared source
    pub fn from_arc(source: Arc<dyn TokenSource>) -> Self {
        Self {
            source,
            cached_token: Arc::new(RwLock::new(None)),
        }
    }

    /// Get the token, loading it from the source on first use
    pub async fn token(&self) -> Result<String> {
        if let Some(token) = self.cached_token.read().await.as_ref() {
            return Ok(token.clone());
        }

        let token = self.source.load_token().await?;
        *self.cached_token.write().await = Some(token.clone());
        Ok(token)
    }

    /// Forget the cached token so the next [`token`](Self::token) reloads it
    pub async fn invalidate(&self) {
        debug!("Invalidating cached API token");
        *self.cached_token.write().await = None;
    }
}

impl std::fmt::Debug for AuthTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthTokenProvider")
            .field("source", &self.source.describe())
            .finish_non_exhaustive()
    }
}
