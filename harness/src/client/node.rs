//! # Node Endpoint Model
//!
//! File: harness/src/client/node.rs
//!
//! ## Overview
//!
//! Identifies a node under test: where its client port is published on the
//! host, what the port is inside the container network, and the container
//! identity that doubles as a hostname on that network. Endpoints are
//! immutable per invocation and are typically described in the test suite's
//! TOML fixtures, hence the `Deserialize` derive.
//!
use serde::Deserialize;

/// Connection identity of a node under test.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct NodeEndpoint {
    /// Host where the node's client port is published. Loopback by default;
    /// only meaningful for the local backend in non-tagged mode.
    #[serde(default = "default_exposed_host")]
    pub host: String,
    /// The client port as published on `host`.
    pub client_port: u16,
    /// The client port as bound inside the container network. Carried for
    /// suites that address the node in-network; argument building always
    /// injects `client_port`.
    pub internal_port: u16,
    /// Container name; doubles as the node's hostname on the docker network.
    pub container_name: String,
}

fn default_exposed_host() -> String {
    "localhost".to_string()
}

impl NodeEndpoint {
    /// An endpoint published on loopback, the common local-dev layout.
    pub fn new(container_name: impl Into<String>, client_port: u16, internal_port: u16) -> Self {
        Self {
            host: default_exposed_host(),
            client_port,
            internal_port,
            container_name: container_name.into(),
        }
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults_to_loopback() {
        let node = NodeEndpoint::new("node-0", 40401, 40401);
        assert_eq!(node.host, "localhost");
        assert_eq!(node.container_name, "node-0");
    }

    #[test]
    fn test_deserialize_from_fixture() {
        let node: NodeEndpoint = toml::from_str(
            "client_port = 40401\ninternal_port = 40401\ncontainer_name = \"node-0\"",
        )
        .expect("parse endpoint fixture");
        assert_eq!(node, NodeEndpoint::new("node-0", 40401, 40401));
    }
}
