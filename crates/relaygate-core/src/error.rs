//! Relay and session error types.

use thiserror::Error;

/// Reasons a [`RelayRequest`](crate::relay::RelayRequest) is rejected before
/// any session lookup or upstream call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("relay request has no signer public key")]
    MissingSigner,

    #[error("relay request has no chain")]
    MissingChain,

    #[error("relay request has an empty payload")]
    EmptyPayload,

    #[error("relay request has no selected node public key")]
    MissingNodePublicKey,
}

/// Errors returned by a [`RelayProvider`](crate::provider::RelayProvider)
/// and by the guarded client wrapping one.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The relay request failed its own validation contract.
    #[error("invalid relay request: {0}")]
    Validation(#[from] ValidationError),

    /// A session fetch failed within the cooldown window; the upstream was
    /// not contacted.
    #[error("session dispatch recently failed, returning early")]
    RecentlyFailed,

    /// HTTP-level failure talking to the upstream (connection refused, 5xx...).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The upstream answered with a protocol-level error.
    #[error("upstream error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The upstream did not answer in time.
    #[error("request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// A relay response body could not be decoded.
    #[error("deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl RelayError {
    /// Returns `true` if the request was malformed.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns `true` if this is the synthetic cooldown rejection.
    pub fn is_recently_failed(&self) -> bool {
        matches!(self, Self::RecentlyFailed)
    }

    /// Returns `true` if the error came from (or while reaching) the upstream.
    pub fn is_upstream(&self) -> bool {
        !self.is_validation() && !self.is_recently_failed()
    }
}
