//! # Execution Backends
//!
//! File: harness/src/client/backend.rs
//!
//! ## Overview
//!
//! The `Execute` trait is the seam between the driver and the two ways a
//! client command can actually run: as a local child process against the
//! node's published ports (`LocalProcess`), or inside the node's container
//! via the docker exec facility (`ContainerExec`). Both produce the same
//! `InvocationResult`; neither treats a nonzero exit as an error, since that
//! judgment belongs to the driver.
//!
//! ## Architecture
//!
//! - `Execute` is an object-safe async trait (via `async-trait`), so suites
//!   can substitute their own strategy (e.g. a scripted fake) when driving
//!   the call contract without processes.
//! - `BackendKind` feeds host resolution; it is the only thing the argument
//!   builder needs to know about a backend.
//! - One invocation equals one fully-awaited child process or exec instance.
//!   No timeout is imposed here; callers needing a bound impose it externally
//!   (e.g. `tokio::time::timeout`).
//!
use crate::common::docker;
use crate::core::error::{HarnessError, Result};
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

/// Which execution strategy a backend implements; drives host resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Local,
    Container,
}

/// Captured result of one client invocation.
#[derive(Debug, Clone)]
pub struct InvocationResult {
    /// Process exit code; `-1` when the platform reports none (e.g. killed by
    /// signal, or the Docker API omitted it).
    pub exit_code: i64,
    /// Raw bytes the client wrote to stdout.
    pub stdout: Vec<u8>,
    /// Raw bytes the client wrote to stderr. `None` for the container
    /// backend: the exec facility attaches stdout only, so stderr is not
    /// observable there. Known limitation, preserved deliberately.
    pub stderr: Option<Vec<u8>>,
}

/// An execution strategy for running the client command line.
#[async_trait]
pub trait Execute: Send + Sync {
    /// The strategy's kind, consumed by host resolution.
    fn kind(&self) -> BackendKind;

    /// Runs the full command line (binary name first) and captures the
    /// result. Nonzero exits are returned, not raised.
    async fn execute(&self, command_line: &[String]) -> Result<InvocationResult>;
}

/// Runs the client as a local child process.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalProcess;

#[async_trait]
impl Execute for LocalProcess {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    async fn execute(&self, command_line: &[String]) -> Result<InvocationResult> {
        let (program, args) = command_line.split_first().ok_or_else(|| {
            anyhow!(HarnessError::Config(
                "cannot execute an empty command line".to_string()
            ))
        })?;

        // `output()` pipes stdout/stderr and nulls stdin, so the child never
        // inherits the harness's streams.
        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .with_context(|| format!("Failed to run client binary '{}'", program))?;

        debug!(
            "Client process '{}' finished with status {:?}",
            program,
            output.status.code()
        );

        Ok(InvocationResult {
            exit_code: output.status.code().map(i64::from).unwrap_or(-1),
            stdout: output.stdout,
            stderr: Some(output.stderr),
        })
    }
}

/// Runs the client inside the node's container via the docker exec facility.
#[derive(Debug, Clone)]
pub struct ContainerExec {
    container: String,
}

impl ContainerExec {
    /// A backend bound to the given container.
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
        }
    }

    /// The container this backend executes in.
    pub fn container(&self) -> &str {
        &self.container
    }
}

#[async_trait]
impl Execute for ContainerExec {
    fn kind(&self) -> BackendKind {
        BackendKind::Container
    }

    async fn execute(&self, command_line: &[String]) -> Result<InvocationResult> {
        // The exec facility takes one shell line. Arguments are joined
        // verbatim; the client vocabulary carries no whitespace-bearing
        // arguments.
        let command = command_line.join(" ");
        debug!(
            "Delegating to container '{}' for: {}",
            self.container, command
        );
        let (exit_code, stdout) = docker::exec_capture(&self.container, &command).await?;
        Ok(InvocationResult {
            exit_code,
            stdout,
            stderr: None,
        })
    }
}
