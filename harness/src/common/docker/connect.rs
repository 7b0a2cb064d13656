//! # Harness Docker Connection Helper
//!
//! File: harness/src/common/docker/connect.rs
//!
//! ## Overview
//!
//! This internal utility module provides a single, standardized function,
//! `connect_docker`, responsible for establishing a connection to the local
//! Docker daemon using default settings provided by the `bollard` crate.
//! It centralizes connection logic and error handling for use by the other
//! modules within `common::docker`.
//!
//! ## Architecture
//!
//! - Defines the asynchronous function `connect_docker`.
//! - Calls `bollard::Docker::connect_with_local_defaults()` to initiate the connection.
//! - Wraps potential connection errors from `bollard` into the harness's
//!   standard `Result` type, mapping them to `HarnessError::DockerApi` and
//!   adding user-friendly context.
//!
use crate::core::error::{HarnessError, Result};
use anyhow::{anyhow, Context};
use bollard::Docker;
use tracing::instrument;

/// Establishes a connection to the local Docker daemon using default settings.
///
/// Attempts to connect to the Docker daemon at its standard location
/// (e.g., `/var/run/docker.sock` on Unix) via
/// `bollard::Docker::connect_with_local_defaults`.
///
/// # Returns
///
/// * `Result<Docker>` - A `bollard::Docker` client instance on successful connection.
///
/// # Errors
///
/// Returns an `Err` wrapping `HarnessError::DockerApi` if the connection fails,
/// with context suggesting that the daemon may not be running or accessible.
#[instrument]
pub async fn connect_docker() -> Result<Docker> {
    Docker::connect_with_local_defaults()
        .map_err(|e| anyhow!(HarnessError::DockerApi { source: e }))
        .context("Failed to connect to Docker daemon. Is it running and accessible?")
}
