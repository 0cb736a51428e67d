//! Fan-out relay dispatch: one task per node, collect every outcome.
//!
//! # Usage
//! ```rust,no_run
//! use std::sync::Arc;
//! use relaygate_core::{dispatch_all, Node, RelayProvider};
//!
//! async fn probe(provider: Arc<dyn RelayProvider>, nodes: Vec<Node>) {
//!     let results = dispatch_all(provider, &nodes, r#"{"method":"eth_blockNumber"}"#, "POST").await;
//!     for result in &results {
//!         println!("{} ok={}", result.node.public_key, result.is_ok());
//!     }
//! }
//! ```

use std::sync::Arc;

use futures::future;

use crate::error::RelayError;
use crate::node::Node;
use crate::provider::RelayProvider;
use crate::relay::{Payload, RelayResponse};

/// Outcome of relaying to a single node.
#[derive(Debug)]
pub struct DispatchResult {
    pub node: Node,
    pub outcome: Result<RelayResponse, RelayError>,
}

impl DispatchResult {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn response(&self) -> Option<&RelayResponse> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&RelayError> {
        self.outcome.as_ref().err()
    }

    pub fn into_result(self) -> Result<RelayResponse, RelayError> {
        self.outcome
    }
}

/// Success/failure counts over a batch of results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

pub fn summarize(results: &[DispatchResult]) -> DispatchSummary {
    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    DispatchSummary {
        succeeded,
        failed: results.len() - succeeded,
    }
}

/// Relay `payload` to every node concurrently and wait for all of them.
///
/// Returns exactly one result per input node (duplicates included). A node's
/// failure, or a panic in its task, only affects its own entry. There is no
/// batch-level timeout; bound the provider's calls instead.
pub async fn dispatch_all<P>(
    provider: Arc<P>,
    nodes: &[Node],
    payload: &str,
    method: &str,
) -> Vec<DispatchResult>
where
    P: RelayProvider + ?Sized,
{
    if nodes.is_empty() {
        return Vec::new();
    }

    let tasks: Vec<_> = nodes
        .iter()
        .map(|node| {
            let provider = Arc::clone(&provider);
            let req = node.relay_request(Payload::new(payload, method));
            tokio::spawn(async move { provider.send_relay(req).await })
        })
        .collect();

    let outcomes = future::join_all(tasks).await;

    nodes
        .iter()
        .cloned()
        .zip(outcomes)
        .map(|(node, joined)| {
            let outcome = joined.unwrap_or_else(|e| {
                Err(RelayError::Other(format!("relay task failed: {e}")))
            });
            if let Err(e) = &outcome {
                tracing::debug!(node = %node.public_key, chain = %node.chain, error = %e, "relay failed");
            }
            DispatchResult { node, outcome }
        })
        .collect()
}
