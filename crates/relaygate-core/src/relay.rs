//! Relay request/response types and the request validation contract.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{RelayError, ValidationError};
use crate::session::{Session, SessionRequest};

/// Application key material used to authorize relays.
///
/// The private key is never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Signer {
    pub public_key: String,
    pub address: String,
    private_key: String,
}

impl Signer {
    pub fn new(
        public_key: impl Into<String>,
        address: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Self {
        Self {
            public_key: public_key.into(),
            address: address.into(),
            private_key: private_key.into(),
        }
    }

    pub fn private_key(&self) -> &str {
        &self.private_key
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("public_key", &self.public_key)
            .field("address", &self.address)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// The data forwarded to a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub data: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
}

impl Payload {
    pub fn new(data: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            method: method.into(),
            ..Default::default()
        }
    }
}

/// A single relay addressed to one node.
#[derive(Debug, Clone)]
pub struct RelayRequest {
    pub signer: Arc<Signer>,
    pub payload: Payload,
    pub chain: String,
    pub selected_node_pub_key: String,
    /// Filled in by the guarded client before the request reaches the upstream.
    pub session: Option<Session>,
}

impl RelayRequest {
    /// Checks the fields every relay needs before a session is resolved.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.signer.public_key.is_empty() {
            return Err(ValidationError::MissingSigner);
        }
        if self.chain.is_empty() {
            return Err(ValidationError::MissingChain);
        }
        if self.payload.data.is_empty() {
            return Err(ValidationError::EmptyPayload);
        }
        if self.selected_node_pub_key.is_empty() {
            return Err(ValidationError::MissingNodePublicKey);
        }
        Ok(())
    }

    /// The session lookup this relay depends on.
    pub fn session_request(&self) -> SessionRequest {
        SessionRequest::new(self.signer.public_key.clone(), self.chain.clone())
    }
}

/// A node's answer to a relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayResponse {
    pub response: String,
    pub signature: String,
}

impl RelayResponse {
    /// Decode the relayed body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, RelayError> {
        Ok(serde_json::from_str(&self.response)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RelayRequest {
        RelayRequest {
            signer: Arc::new(Signer::new("app-pk", "app-addr", "secret")),
            payload: Payload::new(r#"{"jsonrpc":"2.0","id":1,"method":"eth_blockNumber"}"#, "POST"),
            chain: "0021".into(),
            selected_node_pub_key: "node-pk".into(),
            session: None,
        }
    }

    #[test]
    fn valid_request_passes() {
        assert_eq!(request().validate(), Ok(()));
    }

    #[test]
    fn missing_fields_are_rejected() {
        let mut req = request();
        req.chain.clear();
        assert_eq!(req.validate(), Err(ValidationError::MissingChain));

        let mut req = request();
        req.payload.data.clear();
        assert_eq!(req.validate(), Err(ValidationError::EmptyPayload));

        let mut req = request();
        req.selected_node_pub_key.clear();
        assert_eq!(req.validate(), Err(ValidationError::MissingNodePublicKey));

        let mut req = request();
        req.signer = Arc::new(Signer::new("", "addr", "secret"));
        assert_eq!(req.validate(), Err(ValidationError::MissingSigner));
    }

    #[test]
    fn session_request_uses_signer_and_chain() {
        let key = request().session_request().cache_key();
        assert_eq!(key.as_str(), "app-pk-0021");
    }

    #[test]
    fn signer_debug_hides_private_key() {
        let signer = Signer::new("pk", "addr", "super-secret");
        assert_eq!(signer.private_key(), "super-secret");

        let out = format!("{signer:?}");
        assert!(!out.contains("super-secret"));
        assert!(out.contains("pk"));
    }

    #[test]
    fn response_json_decodes_body() {
        let resp = RelayResponse {
            response: r#"{"jsonrpc":"2.0","id":1,"result":"0x10"}"#.into(),
            signature: "sig".into(),
        };
        let body: serde_json::Value = resp.json().unwrap();
        assert_eq!(body["result"], "0x10");

        let bad = RelayResponse { response: "not json".into(), signature: String::new() };
        assert!(matches!(
            bad.json::<serde_json::Value>(),
            Err(RelayError::Deserialization(_))
        ));
    }
}
