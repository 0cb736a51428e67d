//! Fixed-window cooldown breaker.
//!
//! State transitions:
//! - `Closed` → `CoolingDown`: a failure is recorded
//! - `CoolingDown` → `Closed`: the cooldown window elapses, or a success is recorded
//!
//! Unlike a counting breaker, a single failure is enough to trip it, and
//! there is no half-open probe: once the window has elapsed every caller is
//! let through again.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

/// Breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownState {
    /// Normal operation.
    Closed,
    /// A failure happened less than `cooldown` ago; callers should fail fast.
    CoolingDown,
}

impl std::fmt::Display for CooldownState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => write!(f, "closed"),
            Self::CoolingDown => write!(f, "cooling-down"),
        }
    }
}

/// Records the time of the most recent failure.
///
/// `None` means no failure since the last success.
#[derive(Debug, Default)]
pub struct FailureClock {
    last_failure: Mutex<Option<Instant>>,
}

impl FailureClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_failure(&self) {
        *self.lock() = Some(Instant::now());
    }

    pub fn reset(&self) {
        *self.lock() = None;
    }

    /// Time elapsed since the recorded failure, if any.
    pub fn since_last_failure(&self) -> Option<Duration> {
        let last_failure = *self.lock();
        last_failure.map(|at| at.elapsed())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Instant>> {
        self.last_failure.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Thread-safe breaker that rejects calls for `cooldown` after a failure.
#[derive(Debug)]
pub struct CooldownBreaker {
    cooldown: Duration,
    clock: FailureClock,
}

impl CooldownBreaker {
    /// Create a new breaker in `Closed` state.
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            clock: FailureClock::new(),
        }
    }

    pub fn state(&self) -> CooldownState {
        match self.clock.since_last_failure() {
            Some(elapsed) if elapsed < self.cooldown => CooldownState::CoolingDown,
            _ => CooldownState::Closed,
        }
    }

    /// Returns `true` if the call should go through.
    pub fn is_allowed(&self) -> bool {
        self.state() == CooldownState::Closed
    }

    /// Time left before the breaker lets calls through again.
    pub fn remaining(&self) -> Duration {
        match self.clock.since_last_failure() {
            Some(elapsed) => self.cooldown.saturating_sub(elapsed),
            None => Duration::ZERO,
        }
    }

    pub fn record_success(&self) {
        if self.clock.since_last_failure().is_some() {
            tracing::info!("Cooldown breaker → closed");
        }
        self.clock.reset();
    }

    pub fn record_failure(&self) {
        self.clock.record_failure();
        tracing::warn!(
            cooldown_ms = self.cooldown.as_millis() as u64,
            "Cooldown breaker → cooling down"
        );
    }
}
