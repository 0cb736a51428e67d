//! Candidate relay targets handed over by the node selector.

use std::sync::Arc;

use crate::relay::{Payload, RelayRequest, Signer};
use crate::session::Session;

/// A node eligible to serve a relay, with everything needed to address it.
#[derive(Debug, Clone)]
pub struct Node {
    /// Application key material authorizing relays to this node.
    pub signer: Arc<Signer>,
    pub chain: String,
    pub public_key: String,
    /// Session the node was selected from.
    pub session: Option<Session>,
}

impl Node {
    /// Build the relay request addressing this node.
    pub fn relay_request(&self, payload: Payload) -> RelayRequest {
        RelayRequest {
            signer: Arc::clone(&self.signer),
            payload,
            chain: self.chain.clone(),
            selected_node_pub_key: self.public_key.clone(),
            session: self.session.clone(),
        }
    }
}
