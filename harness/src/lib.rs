//! # clharness
//!
//! File: harness/src/lib.rs
//!
//! ## Overview
//!
//! A uniform command-invocation abstraction for integration-test suites that
//! drive an external command-line client against a running node. The client
//! can run as a local subprocess against the node's published ports, or
//! inside the node's own container via docker exec; either way the harness
//! builds the connection arguments, captures the result, turns nonzero exits
//! into typed errors, and parses successful output into structured values.
//!
//! ## Architecture
//!
//! - `client`: The invocation pipeline: endpoint model, command vocabulary,
//!   argument building, execution backends, the driver, and output parsing.
//! - `common`: Shared infrastructure below the API; currently the Docker
//!   boundary used by the in-container backend.
//! - `core`: Foundational pieces (configuration and error types).
//!
//! ## Usage
//!
//! ```no_run
//! use clharness::{ClientCommand, ClientConfig, ClientDriver, NodeEndpoint};
//!
//! # async fn example() -> clharness::Result<()> {
//! let node = NodeEndpoint::new("node-0", 40401, 40401);
//! let driver = ClientDriver::local(node, ClientConfig::load()?);
//!
//! let _outcome = driver.call(ClientCommand::ShowBlocks, ["--depth", "5"]).await?;
//! # Ok(())
//! # }
//! ```
//!
pub mod client;
pub mod common;
pub mod core;

pub use crate::client::{
    BackendKind, ClientCommand, ClientDriver, CommandOutcome, ContainerExec, Execute,
    InvocationResult, LocalProcess, NodeEndpoint, RawOutput,
};
pub use crate::core::config::{ClientConfig, TlsConfig};
pub use crate::core::error::{HarnessError, Result};

use tracing_subscriber::{fmt, EnvFilter};

/// Initializes a compact stderr tracing subscriber for test binaries.
///
/// Filtering follows `RUST_LOG` when set, defaulting to `info` so the two
/// planned-invocation lines show up in failing test output. Safe to call from
/// multiple tests; only the first initialization wins.
pub fn init_diagnostics() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
