//! # Harness Docker Exec Capture
//!
//! File: harness/src/common/docker/exec.rs
//!
//! ## Overview
//!
//! This module provides the container command-execution facility used by the
//! in-container backend: `exec_capture` runs a shell command inside the node's
//! container and returns its exit code together with the captured stdout
//! bytes. Unlike an interactive `docker exec`, nothing is streamed to the
//! host's terminal; the bytes are handed back to the output-parsing stage
//! untouched.
//!
//! ## Architecture
//!
//! - Verifies the target container exists and is running (via `state`), so a
//!   dead node surfaces as a typed error instead of a confusing exec failure.
//! - Creates a Docker exec instance running the command under `/bin/sh -c`,
//!   with stdout attached and captured.
//! - Stderr is deliberately not attached: the capture contract of this
//!   facility is stdout-only, and callers treat stderr as unobservable. See
//!   `InvocationResult::stderr` for where that limitation is surfaced.
//! - Retrieves the command's exit code by inspecting the exec instance after
//!   the output stream ends.
//!
use crate::core::error::{HarnessError, Result};
use anyhow::anyhow;
use bollard::{
    container::LogOutput,
    exec::{CreateExecOptions, StartExecResults},
};
use futures_util::StreamExt;
use tracing::{debug, info, instrument, warn};

use super::connect::connect_docker;
use super::state::{container_exists, container_running};

/// Runs a shell command inside a running container and captures its stdout.
///
/// The command string is executed under `/bin/sh -c` inside the container, so
/// it is resolved against the container's own filesystem and network identity.
///
/// # Arguments
///
/// * `name_or_id` - The name or ID of the target container.
/// * `command` - The shell command line to run, as a single string.
///
/// # Returns
///
/// * `Result<(i64, Vec<u8>)>` - The command's exit code and the raw bytes it
///   wrote to stdout. Returns `-1` as the exit code if the Docker API does not
///   report one.
///
/// # Errors
///
/// * `HarnessError::ContainerNotFound` - If the container does not exist.
/// * `HarnessError::ContainerNotRunning` - If the container exists but is stopped.
/// * `HarnessError::DockerApi` - For errors communicating with the Docker daemon.
#[instrument(skip(name_or_id, command), fields(container = %name_or_id))]
pub async fn exec_capture(name_or_id: &str, command: &str) -> Result<(i64, Vec<u8>)> {
    // Establish connection to Docker daemon.
    let docker = connect_docker().await?;

    // --- Check Container State ---
    // Stopped containers are not auto-started; the state is reported and the
    // calling test decides what to do about its node.
    if !container_running(name_or_id).await? {
        if container_exists(name_or_id).await? {
            warn!(
                "Container '{}' exists but is not running; refusing to exec.",
                name_or_id
            );
            return Err(anyhow!(HarnessError::ContainerNotRunning {
                name: name_or_id.to_string()
            }));
        }
        return Err(anyhow!(HarnessError::ContainerNotFound {
            name: name_or_id.to_string()
        }));
    }

    info!(
        "Creating exec instance in container '{}' for: {}",
        name_or_id, command
    );

    // --- Create Exec Instance ---
    // The command runs under `/bin/sh -c` so it resolves against the
    // container's own filesystem and network identity.
    let exec_options = CreateExecOptions {
        attach_stdout: Some(true),
        attach_stderr: Some(false),
        attach_stdin: Some(false),
        tty: Some(false),
        cmd: Some(vec![
            "/bin/sh".to_string(),
            "-c".to_string(),
            command.to_string(),
        ]),
        ..Default::default()
    };

    let exec_create_response = docker
        .create_exec(name_or_id, exec_options)
        .await
        .map_err(|e| match e {
            bollard::errors::Error::DockerResponseServerError {
                status_code: 404, ..
            } => anyhow!(HarnessError::ContainerNotFound {
                name: name_or_id.to_string()
            }),
            _ => anyhow!(HarnessError::DockerApi { source: e }).context(format!(
                "Failed to create exec instance in container '{}'",
                name_or_id
            )),
        })?;

    // Get the ID assigned to the new exec instance.
    let exec_id = exec_create_response.id;
    debug!("Created exec instance ID: {}", exec_id);

    // --- Start Exec Instance and Capture Output ---
    let start_exec_result = docker.start_exec(&exec_id, None).await.map_err(|e| {
        anyhow!(HarnessError::DockerApi { source: e }).context("Failed to start exec instance")
    })?;

    let mut captured: Vec<u8> = Vec::new();
    match start_exec_result {
        StartExecResults::Attached { mut output, .. } => {
            while let Some(chunk) = output.next().await {
                match chunk {
                    Ok(LogOutput::StdOut { message }) => captured.extend_from_slice(&message),
                    Ok(other) => {
                        // Stdin echoes and console frames are not part of the
                        // captured contract.
                        debug!("Ignoring non-stdout exec output chunk: {:?}", other);
                    }
                    Err(e) => {
                        return Err(anyhow!(HarnessError::DockerApi { source: e }).context(
                            format!(
                                "Error reading exec output from container '{}'",
                                name_or_id
                            ),
                        ));
                    }
                }
            }
        }
        StartExecResults::Detached => {
            warn!(
                "Exec instance '{}' unexpectedly started detached; no output captured.",
                exec_id
            );
        }
    }

    // --- Determine Exit Code ---
    // The exit code is only available once the output stream has ended.
    let inspect_response = docker.inspect_exec(&exec_id).await.map_err(|e| {
        anyhow!(HarnessError::DockerApi { source: e }).context(format!(
            "Failed to inspect exec instance '{}' after execution",
            exec_id
        ))
    })?;
    let exit_code = inspect_response.exit_code.unwrap_or(-1);
    debug!(
        "Exec instance '{}' finished with exit code {} ({} stdout bytes)",
        exec_id,
        exit_code,
        captured.len()
    );

    Ok((exit_code, captured))
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    /// Requires a running Docker daemon plus a running container named
    /// `clharness-test-node`. Run locally with `cargo test -- --ignored`.
    #[tokio::test]
    #[ignore] // Requires a running Docker daemon and a prepared container.
    async fn test_exec_capture_roundtrip() {
        let (exit_code, stdout) = exec_capture("clharness-test-node", "printf hello")
            .await
            .expect("exec should succeed in a running container");
        assert_eq!(exit_code, 0);
        assert_eq!(stdout, b"hello");
    }

    /// Requires a running Docker daemon.
    #[tokio::test]
    #[ignore] // Requires a running Docker daemon.
    async fn test_exec_capture_missing_container() {
        let err = exec_capture("clharness-definitely-not-a-container", "true")
            .await
            .expect_err("exec against a missing container should fail");
        assert!(err
            .downcast_ref::<HarnessError>()
            .is_some_and(|e| matches!(e, HarnessError::ContainerNotFound { .. })));
    }
}
