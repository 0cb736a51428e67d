//! Tunables for [`GuardedSessionClient`](crate::guarded::GuardedSessionClient).

use std::time::Duration;

/// How long session fetches are rejected after an upstream failure.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(5);
/// Lifetime of a cached session.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(75 * 60);
/// Maximum simultaneous upstream session fetches.
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 50;
/// How often expired cache entries are reclaimed.
pub const DEFAULT_EVICTION_INTERVAL: Duration = Duration::from_secs(60);

/// Configuration for the guarded session client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardConfig {
    pub cooldown: Duration,
    pub session_ttl: Duration,
    pub max_concurrent_fetches: usize,
    pub eviction_interval: Duration,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            cooldown: DEFAULT_COOLDOWN,
            session_ttl: DEFAULT_SESSION_TTL,
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            eviction_interval: DEFAULT_EVICTION_INTERVAL,
        }
    }
}

impl GuardConfig {
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    pub fn with_max_concurrent_fetches(mut self, max: usize) -> Self {
        self.max_concurrent_fetches = max;
        self
    }

    pub fn with_eviction_interval(mut self, every: Duration) -> Self {
        self.eviction_interval = every;
        self
    }
}
