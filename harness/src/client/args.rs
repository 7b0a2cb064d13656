//! # Client Argument Building
//!
//! File: harness/src/client/args.rs
//!
//! ## Overview
//!
//! Pure functions that turn a caller's raw argument list into the full
//! argument vector handed to the client binary. Two concerns live here:
//!
//! - **Host resolution** (`resolve_host`): which hostname the client should
//!   dial, as a pure function of backend kind, the tagged-mode marker, and
//!   the node endpoint. Nothing is stored or mutated between calls, so
//!   concurrent invocations sharing a driver cannot race on the host.
//! - **Argument expansion** (`build_args`): prepending the connection
//!   arguments and the optional TLS parameter, unless the caller is asking
//!   for help text, which must not depend on a live endpoint.
//!
//! Argument contents are not validated beyond stringification; malformed
//! client arguments are the client binary's concern, not this layer's.
//!
use crate::client::backend::BackendKind;
use crate::client::node::NodeEndpoint;
use crate::core::config::ClientConfig;

/// The help flag that suppresses connection-argument injection.
pub const HELP_FLAG: &str = "--help";

/// Resolves the hostname the client should dial.
///
/// - The container backend always addresses the container's own identity: the
///   command runs on the container network, not through the published port
///   mapping.
/// - The local backend addresses the container identity in tagged/released
///   mode (the client runs inside the same docker network there) and the
///   endpoint's exposed host otherwise.
pub fn resolve_host(kind: BackendKind, tagged_mode: bool, node: &NodeEndpoint) -> String {
    match kind {
        BackendKind::Container => node.container_name.clone(),
        BackendKind::Local if tagged_mode => node.container_name.clone(),
        BackendKind::Local => node.host.clone(),
    }
}

/// Expands a raw argument list into the client's full argument vector.
///
/// Returns `args` unchanged when it contains `--help`. Otherwise the result
/// is `["--host", host, "--port", client_port]`, then the TLS parameter pair
/// when configured, then the original arguments in order.
pub fn build_args(
    config: &ClientConfig,
    node: &NodeEndpoint,
    host: &str,
    args: &[String],
) -> Vec<String> {
    if args.iter().any(|arg| arg == HELP_FLAG) {
        return args.to_vec();
    }

    let mut full = vec![
        "--host".to_string(),
        host.to_string(),
        "--port".to_string(),
        node.client_port.to_string(),
    ];
    if let Some(tls) = &config.tls {
        full.push(tls.parameter_name.clone());
        full.push(tls.value.clone());
    }
    full.extend_from_slice(args);
    full
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::TlsConfig;

    fn node() -> NodeEndpoint {
        NodeEndpoint::new("node-0", 40401, 40401)
    }

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_help_passes_through_unmodified() {
        let config = ClientConfig::default();
        let args = strings(&["deploy", "--help"]);
        let built = build_args(&config, &node(), "localhost", &args);
        assert_eq!(built, args);
    }

    #[test]
    fn test_help_passes_through_even_with_tls() {
        let config = ClientConfig {
            tls: Some(TlsConfig::new("/certs/node-0.pem")),
            ..ClientConfig::default()
        };
        let args = strings(&[HELP_FLAG]);
        let built = build_args(&config, &node(), "node-0", &args);
        assert_eq!(built, args);
    }

    #[test]
    fn test_connection_arguments_prefix_in_order() {
        let config = ClientConfig::default();
        let args = strings(&["deploy", "--from", "a1b2"]);
        let built = build_args(&config, &node(), "localhost", &args);
        assert_eq!(
            built,
            strings(&[
                "--host", "localhost", "--port", "40401", "deploy", "--from", "a1b2"
            ])
        );
    }

    #[test]
    fn test_tls_pair_sits_between_connection_and_user_args() {
        let config = ClientConfig {
            tls: Some(TlsConfig::new("/certs/node-0.pem")),
            ..ClientConfig::default()
        };
        let built = build_args(&config, &node(), "localhost", &strings(&["show-blocks"]));
        assert_eq!(
            built,
            strings(&[
                "--host",
                "localhost",
                "--port",
                "40401",
                "--certificate-file",
                "/certs/node-0.pem",
                "show-blocks"
            ])
        );
    }

    #[test]
    fn test_local_host_follows_tagged_marker() {
        // The marker changes the host and nothing else.
        assert_eq!(resolve_host(BackendKind::Local, false, &node()), "localhost");
        assert_eq!(resolve_host(BackendKind::Local, true, &node()), "node-0");

        let config = ClientConfig::default();
        let untagged = build_args(
            &config,
            &node(),
            &resolve_host(BackendKind::Local, false, &node()),
            &strings(&["show-blocks"]),
        );
        let tagged = build_args(
            &config,
            &node(),
            &resolve_host(BackendKind::Local, true, &node()),
            &strings(&["show-blocks"]),
        );
        assert_eq!(untagged[1], "localhost");
        assert_eq!(tagged[1], "node-0");
        // Everything apart from the host value is identical.
        let mut untagged_rest = untagged.clone();
        let mut tagged_rest = tagged.clone();
        untagged_rest.remove(1);
        tagged_rest.remove(1);
        assert_eq!(untagged_rest, tagged_rest);
    }

    #[test]
    fn test_container_backend_ignores_tagged_marker() {
        assert_eq!(resolve_host(BackendKind::Container, false, &node()), "node-0");
        assert_eq!(resolve_host(BackendKind::Container, true, &node()), "node-0");
    }

    #[test]
    fn test_exposed_host_is_honored_for_local() {
        let mut endpoint = node();
        endpoint.host = "10.0.0.7".to_string();
        assert_eq!(resolve_host(BackendKind::Local, false, &endpoint), "10.0.0.7");
    }
}
