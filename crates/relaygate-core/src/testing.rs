//! Scriptable in-memory provider shared by the unit tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::error::RelayError;
use crate::node::Node;
use crate::provider::{HealthStatus, RelayProvider};
use crate::relay::{RelayRequest, RelayResponse, Signer};
use crate::session::{Session, SessionHeader, SessionNode, SessionRequest, SessionResponse};

#[derive(Default)]
pub(crate) struct MockProvider {
    session_calls: AtomicUsize,
    relay_calls: AtomicUsize,
    fail_sessions: AtomicBool,
    failing_nodes: Mutex<HashSet<String>>,
    /// When set, `get_session` waits for a permit before answering.
    gate: Option<Arc<Semaphore>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    last_relay: Mutex<Option<RelayRequest>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider whose session fetches block until `gate` hands out permits.
    pub fn gated(gate: Arc<Semaphore>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn fail_sessions(&self, fail: bool) {
        self.fail_sessions.store(fail, Ordering::SeqCst);
    }

    pub fn fail_node(&self, public_key: &str) {
        self.failing_nodes.lock().unwrap().insert(public_key.to_string());
    }

    pub fn session_calls(&self) -> usize {
        self.session_calls.load(Ordering::SeqCst)
    }

    pub fn relay_calls(&self) -> usize {
        self.relay_calls.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn last_relay(&self) -> Option<RelayRequest> {
        self.last_relay.lock().unwrap().clone()
    }
}

#[async_trait]
impl RelayProvider for MockProvider {
    async fn get_session(&self, req: &SessionRequest) -> Result<SessionResponse, RelayError> {
        let call = self.session_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_sessions.load(Ordering::SeqCst) {
            return Err(RelayError::Http("dispatcher unavailable".into()));
        }
        Ok(session_response(req, call as u64))
    }

    async fn send_relay(&self, req: RelayRequest) -> Result<RelayResponse, RelayError> {
        self.relay_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_relay.lock().unwrap() = Some(req.clone());

        if self.failing_nodes.lock().unwrap().contains(&req.selected_node_pub_key) {
            return Err(RelayError::Rpc {
                code: -32000,
                message: format!("node {} refused relay", req.selected_node_pub_key),
            });
        }
        Ok(RelayResponse {
            response: format!(r#"{{"node":"{}"}}"#, req.selected_node_pub_key),
            signature: format!("sig-{}", req.selected_node_pub_key),
        })
    }

    async fn latest_block_height(&self) -> Result<u64, RelayError> {
        Ok(42)
    }

    fn health(&self) -> HealthStatus {
        HealthStatus::Healthy
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Session answer whose height records which upstream call produced it.
pub(crate) fn session_response(req: &SessionRequest, height: u64) -> SessionResponse {
    SessionResponse {
        session: Session {
            key: format!("{}@{height}", req.cache_key()),
            header: SessionHeader {
                app_public_key: req.app_public_key.clone(),
                chain: req.chain.clone(),
                session_height: height,
            },
            nodes: vec![SessionNode {
                public_key: "node-pk".into(),
                service_url: "https://node.example".into(),
            }],
        },
        block_height: height,
    }
}

pub(crate) fn node(public_key: &str) -> Node {
    Node {
        signer: Arc::new(Signer::new("app-pk", "app-addr", "app-secret")),
        chain: "0021".into(),
        public_key: public_key.into(),
        session: None,
    }
}
