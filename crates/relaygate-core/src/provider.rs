//! The `RelayProvider` trait — the upstream session/relay capability.

use async_trait::async_trait;

use crate::error::RelayError;
use crate::relay::{RelayRequest, RelayResponse};
use crate::session::{SessionRequest, SessionResponse};

/// Provider health status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    /// Provider is responding normally.
    Healthy,
    /// Provider is reachable but callers are queueing for it.
    Degraded,
    /// Provider recently failed and is being shielded from traffic.
    Unhealthy,
    /// Health status is unknown (not yet checked).
    Unknown,
}

impl HealthStatus {
    /// Whether callers can expect a request to go through right now.
    pub fn is_serving(self) -> bool {
        matches!(self, Self::Healthy | Self::Degraded | Self::Unknown)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Unhealthy => "unhealthy",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An upstream that issues sessions and forwards relays to nodes.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` for use across Tokio tasks.
///
/// # Object Safety
/// The trait is object-safe and can be stored as `Arc<dyn RelayProvider>`.
#[async_trait]
pub trait RelayProvider: Send + Sync + 'static {
    /// Fetch the current session for an application/chain pair.
    async fn get_session(&self, req: &SessionRequest) -> Result<SessionResponse, RelayError>;

    /// Forward a relay to the node named in the request.
    async fn send_relay(&self, req: RelayRequest) -> Result<RelayResponse, RelayError>;

    /// Latest block height known to the upstream.
    async fn latest_block_height(&self) -> Result<u64, RelayError>;

    /// Return the current health status of this provider.
    fn health(&self) -> HealthStatus {
        HealthStatus::Unknown
    }

    /// Return the provider's identifier (URL or name).
    fn name(&self) -> &str;
}
