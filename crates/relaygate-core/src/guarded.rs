//! Session-caching, concurrency-limited, cooldown-guarded provider wrapper.
//!
//! Every session fetch goes through, in order:
//! 1. the TTL cache (hits never touch the breaker or the slot pool)
//! 2. the cooldown breaker (rejections are cheap and never take a slot)
//! 3. the concurrency limiter (waits while all slots are busy)
//! 4. the wrapped provider
//!
//! Only session fetch failures trip the breaker; relay failures are returned
//! to the caller without affecting it.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::cache::{EvictionTask, SessionCache};
use crate::config::GuardConfig;
use crate::error::RelayError;
use crate::policy::{ConcurrencyLimiter, CooldownBreaker};
use crate::provider::{HealthStatus, RelayProvider};
use crate::relay::{RelayRequest, RelayResponse};
use crate::session::{SessionRequest, SessionResponse};

/// Wraps a [`RelayProvider`] with a session cache, a fetch concurrency
/// ceiling and a cooldown breaker.
///
/// Construction inside a Tokio runtime starts the cache eviction task; it is
/// stopped by [`shutdown`](Self::shutdown) or when the client is dropped.
pub struct GuardedSessionClient<P: ?Sized> {
    inner: Arc<P>,
    cache: SessionCache,
    breaker: CooldownBreaker,
    limiter: ConcurrencyLimiter,
    eviction: Mutex<Option<EvictionTask>>,
}

impl<P: RelayProvider + ?Sized> GuardedSessionClient<P> {
    pub fn new(inner: Arc<P>, config: GuardConfig) -> Self {
        let cache = SessionCache::new(config.session_ttl);
        let eviction = cache.start_eviction(config.eviction_interval);
        if eviction.is_none() {
            tracing::warn!(
                provider = inner.name(),
                "no Tokio runtime; expired sessions are only reclaimed on overwrite"
            );
        }
        Self {
            inner,
            cache,
            breaker: CooldownBreaker::new(config.cooldown),
            limiter: ConcurrencyLimiter::new(config.max_concurrent_fetches),
            eviction: Mutex::new(eviction),
        }
    }

    /// Wrap `inner` with the default configuration.
    pub fn with_defaults(inner: Arc<P>) -> Self {
        Self::new(inner, GuardConfig::default())
    }

    /// The wrapped provider.
    pub fn inner(&self) -> &Arc<P> {
        &self.inner
    }

    /// Resolve a session, sharing the cached value instead of cloning it.
    pub async fn session(&self, req: &SessionRequest) -> Result<Arc<SessionResponse>, RelayError> {
        let key = req.cache_key();
        if let Some(cached) = self.cache.get(&key) {
            tracing::trace!(key = %key, "session cache hit");
            return Ok(cached);
        }

        if !self.breaker.is_allowed() {
            tracing::debug!(
                key = %key,
                remaining_ms = self.breaker.remaining().as_millis() as u64,
                "session fetch rejected during cooldown"
            );
            return Err(RelayError::RecentlyFailed);
        }

        let response = {
            let _permit = self.limiter.acquire().await?;
            tracing::debug!(key = %key, provider = self.inner.name(), "fetching session");
            self.inner.get_session(req).await
        };

        match response {
            Ok(response) => {
                let response = Arc::new(response);
                self.cache.insert(key, Arc::clone(&response));
                self.breaker.record_success();
                Ok(response)
            }
            Err(e) => {
                tracing::debug!(key = %key, error = %e, "session fetch failed");
                self.breaker.record_failure();
                Err(e)
            }
        }
    }

    /// Returns `true` while session fetches are being rejected.
    pub fn is_cooling_down(&self) -> bool {
        !self.breaker.is_allowed()
    }

    /// Entries currently held by the session cache.
    pub fn cached_sessions(&self) -> usize {
        self.cache.len()
    }

    /// Fetch slots not currently in use.
    pub fn available_slots(&self) -> usize {
        self.limiter.available()
    }

    /// Stop the cache eviction task. Cached sessions stay usable and still
    /// expire on schedule.
    pub async fn shutdown(&self) {
        let task = self
            .eviction
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            task.stop().await;
        }
    }
}

#[async_trait]
impl<P: RelayProvider + ?Sized> RelayProvider for GuardedSessionClient<P> {
    async fn get_session(&self, req: &SessionRequest) -> Result<SessionResponse, RelayError> {
        let response = self.session(req).await?;
        Ok(response.as_ref().clone())
    }

    async fn send_relay(&self, mut req: RelayRequest) -> Result<RelayResponse, RelayError> {
        req.validate()?;

        let response = self.session(&req.session_request()).await?;
        req.session = Some(response.session.clone());
        self.inner.send_relay(req).await
    }

    async fn latest_block_height(&self) -> Result<u64, RelayError> {
        self.inner.latest_block_height().await
    }

    fn health(&self) -> HealthStatus {
        if self.is_cooling_down() {
            HealthStatus::Unhealthy
        } else if self.limiter.is_saturated() {
            HealthStatus::Degraded
        } else {
            self.inner.health()
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

impl<P: ?Sized> std::fmt::Debug for GuardedSessionClient<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardedSessionClient")
            .field("cache", &self.cache)
            .field("breaker", &self.breaker.state())
            .field("available_slots", &self.limiter.available())
            .finish()
    }
}
