//! # Client Driver
//!
//! File: harness/src/client/driver.rs
//!
//! ## Overview
//!
//! `ClientDriver` is the harness's top-level call contract: one method,
//! `call`, that builds the argument vector, executes through the injected
//! backend, normalizes nonzero exits into `HarnessError::ClientExit`, and
//! dispatches successful stdout to the output parser.
//!
//! ## Architecture
//!
//! The driver is generic over its execution strategy, so the same call logic
//! serves both the local-subprocess and in-container paths (and any scripted
//! strategy a test injects):
//!
//! - `ClientDriver::local` drives the client as a host subprocess against
//!   the node's published ports.
//! - `ClientDriver::in_container` drives the client through the docker exec
//!   facility, bound to the node's container.
//!
//! Host resolution happens fresh on every call from the backend kind, the
//! tagged-mode flag, and the endpoint; the driver holds no mutable state, so
//! a single instance is safe to share across concurrent test tasks. Each call
//! owns its own child process or exec instance.
//!
//! ## Usage
//!
//! ```text
//! let driver = ClientDriver::local(node, ClientConfig::load()?);
//! let deploy_hash = driver
//!     .call(ClientCommand::Deploy, ["--from", account, "--session", wasm])
//!     .await?;
//! ```
//!
use crate::client::args::{build_args, resolve_host};
use crate::client::backend::{ContainerExec, Execute, LocalProcess};
use crate::client::command::ClientCommand;
use crate::client::node::NodeEndpoint;
use crate::client::output::{parse_output, CommandOutcome, RawOutput};
use crate::core::config::ClientConfig;
use crate::core::error::{HarnessError, Result};
use anyhow::anyhow;
use tracing::info;

/// Drives the external client against one node through one backend.
pub struct ClientDriver<B> {
    node: NodeEndpoint,
    config: ClientConfig,
    backend: B,
}

impl ClientDriver<LocalProcess> {
    /// A driver running the client as a local subprocess.
    pub fn local(node: NodeEndpoint, config: ClientConfig) -> Self {
        Self::new(node, config, LocalProcess)
    }
}

impl ClientDriver<ContainerExec> {
    /// A driver running the client inside the node's own container.
    pub fn in_container(node: NodeEndpoint, config: ClientConfig) -> Self {
        let backend = ContainerExec::new(node.container_name.clone());
        Self::new(node, config, backend)
    }
}

impl<B: Execute> ClientDriver<B> {
    /// A driver over an explicit execution strategy.
    pub fn new(node: NodeEndpoint, config: ClientConfig, backend: B) -> Self {
        Self {
            node,
            config,
            backend,
        }
    }

    /// The endpoint this driver addresses.
    pub fn node(&self) -> &NodeEndpoint {
        &self.node
    }

    /// The configuration this driver was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Invokes `command` with `args` and parses its output.
    ///
    /// Logs the planned invocation twice before executing: once as the
    /// argument vector, once joined as a shell-like string for copy/paste
    /// reproduction of failing test runs.
    ///
    /// # Errors
    ///
    /// * `HarnessError::ClientExit` - the client exited nonzero; carries the
    ///   full process result and a best-effort decoding of stdout. Stderr is
    ///   not surfaced here (and is absent entirely for the container
    ///   backend); it remains inspectable on the carried result.
    /// * Parsing errors from `parse_output` on malformed success output.
    pub async fn call<I, S>(&self, command: ClientCommand, args: I) -> Result<CommandOutcome>
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let host = resolve_host(self.backend.kind(), self.config.tagged_mode, &self.node);

        let mut raw_args = vec![command.name().to_string()];
        raw_args.extend(args.into_iter().map(|arg| arg.to_string()));

        let expanded = build_args(&self.config, &self.node, &host, &raw_args);
        let mut command_line = Vec::with_capacity(expanded.len() + 1);
        command_line.push(self.config.client_cmd.clone());
        command_line.extend(expanded);

        info!("Invoking client: {:?}", command_line);
        info!("Invoking client: {}", command_line.join(" "));

        let result = self.backend.execute(&command_line).await?;

        if result.exit_code != 0 {
            let output = RawOutput::from_bytes(result.stdout.clone());
            return Err(anyhow!(HarnessError::ClientExit { result, output }));
        }

        parse_output(&command, result.stdout)
    }
}
