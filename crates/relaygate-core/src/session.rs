//! Session wire types and the cache key derived from them.

use serde::{Deserialize, Serialize};

/// A node assigned to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionNode {
    pub public_key: String,
    pub service_url: String,
}

/// Identifies which application/chain pair a session was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionHeader {
    pub app_public_key: String,
    pub chain: String,
    pub session_height: u64,
}

/// Upstream-issued authorization context for relaying to a set of nodes.
///
/// Treated as opaque by this crate: it is cached and attached to relay
/// requests but never inspected or mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub key: String,
    pub header: SessionHeader,
    pub nodes: Vec<SessionNode>,
}

/// Lookup parameters for [`RelayProvider::get_session`](crate::provider::RelayProvider::get_session).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRequest {
    pub app_public_key: String,
    pub chain: String,
}

impl SessionRequest {
    pub fn new(app_public_key: impl Into<String>, chain: impl Into<String>) -> Self {
        Self {
            app_public_key: app_public_key.into(),
            chain: chain.into(),
        }
    }

    /// Deterministic cache key for this application/chain pair.
    pub fn cache_key(&self) -> SessionKey {
        SessionKey(format!("{}-{}", self.app_public_key, self.chain))
    }
}

/// Upstream answer to a session lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session: Session,
    pub block_height: u64,
}

/// Cache key of the form `<app public key>-<chain>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionKey(String);

impl SessionKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
