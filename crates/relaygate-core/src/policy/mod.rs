//! Policy engine — the guards the session client puts in front of its upstream.
//!
//! Guards applied on a session fetch (in order):
//! ```text
//! Request → [SessionCache] → [CooldownBreaker] → [ConcurrencyLimiter] → [Provider]
//! ```

pub mod concurrency;
pub mod cooldown;

pub use concurrency::ConcurrencyLimiter;
pub use cooldown::{CooldownBreaker, CooldownState, FailureClock};
