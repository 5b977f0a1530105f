//! Caching layer for lookup service responses.
//!
//! Route geometry changes rarely, so identical lookups within the TTL
//! are served from memory. Only responses that parse as a successful
//! envelope are cached; a cache hit skips the outbound call entirely.

use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::lrs::{LocationsEnvelope, LookupError, LookupRequest, LookupTransport};

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(5 * 60),
            max_capacity: 1000,
        }
    }
}

/// Transport wrapper that caches response bodies by request.
pub struct CachedTransport<T> {
    inner: T,
    bodies: MokaCache<String, String>,
}

impl<T: LookupTransport> CachedTransport<T> {
    pub fn new(inner: T, config: &CacheConfig) -> Self {
        let bodies = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, bodies }
    }

    /// Access the wrapped transport.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.bodies.entry_count()
    }
}

impl<T: LookupTransport> LookupTransport for CachedTransport<T> {
    async fn fetch(&self, request: &LookupRequest) -> Result<String, LookupError> {
        let key = request.cache_key();

        if let Some(body) = self.bodies.get(&key).await {
            return Ok(body);
        }

        let body = self.inner.fetch(request).await?;
        // Error envelopes arrive as 200s; they must not outlive this call
        match LocationsEnvelope::parse(&body) {
            Ok(_) => self.bodies.insert(key, body.clone()).await,
            Err(e) => debug!(%key, error = %e, "not caching unusable response"),
        }

        Ok(body)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for CachedTransport<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedTransport")
            .field("inner", &self.inner)
            .field("entries", &self.bodies.entry_count())
            .finish()
    }
}
