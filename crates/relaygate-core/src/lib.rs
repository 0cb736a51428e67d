//! relaygate-core — resilience and fan-out layer of a blockchain relay gateway.
//!
//! # Overview
//!
//! The crate sits between a gateway's request handlers and an upstream that
//! issues sessions and forwards relays to untrusted, rate-limited nodes. It
//! defines:
//!
//! - [`RelayProvider`] — the upstream capability every provider implements
//! - [`GuardedSessionClient`] — a provider wrapper adding a session TTL cache,
//!   a fetch concurrency ceiling and a cooldown breaker
//! - [`dispatch_all`] — concurrent fan-out of one payload to many nodes
//! - [`RelayError`] — structured error type
//! - [`policy`] module — cooldown breaker, concurrency limiter
//! - [`logging`] module — tracing subscriber setup

pub mod cache;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod guarded;
pub mod logging;
pub mod node;
pub mod policy;
pub mod provider;
pub mod relay;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::SessionCache;
pub use config::GuardConfig;
pub use dispatch::{dispatch_all, summarize, DispatchResult, DispatchSummary};
pub use error::{RelayError, ValidationError};
pub use guarded::GuardedSessionClient;
pub use logging::{init_tracing, LogConfig, LogFormat};
pub use node::Node;
pub use provider::{HealthStatus, RelayProvider};
pub use relay::{Payload, RelayRequest, RelayResponse, Signer};
pub use session::{Session, SessionKey, SessionRequest, SessionResponse};
