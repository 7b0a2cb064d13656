//! # Harness Docker State Querying
//!
//! File: harness/src/common/docker/state.rs
//!
//! ## Overview
//!
//! This module provides utility functions for querying the state of the node
//! container without causing any modifications. The exec-capture facility uses
//! these to distinguish "node container missing" from "node container stopped"
//! before attempting to run a client command inside it.
//!
//! ## Architecture
//!
//! - **`container_exists`**: A boolean check utilizing `inspect_container` and
//!   specifically handling the 404 (Not Found) error case.
//! - **`inspect_container`**: Wraps the `bollard` `inspect_container` call,
//!   returning the full `ContainerInspectResponse` or a specific
//!   `HarnessError::ContainerNotFound` error.
//! - **`container_running`**: Determines the running status by inspecting the
//!   container and checking the `State.Status` field. Handles the "not found"
//!   case gracefully by returning `Ok(false)`.
//!
//! All functions use the shared `connect::connect_docker` helper and map
//! Docker API errors to the harness's standard `Result` and `HarnessError`
//! types.
//!
use crate::core::error::{HarnessError, Result};
use anyhow::anyhow;
use bollard::{
    container::InspectContainerOptions,
    models::{ContainerInspectResponse, ContainerStateStatusEnum},
};
use tracing::{debug, error, instrument, warn};

use super::connect::connect_docker;

/// Checks if a Docker container exists locally by name or ID.
///
/// Uses `inspect_container` and interprets a "Not Found" (404) response from
/// the Docker API as `false`, while other errors are propagated.
///
/// # Arguments
///
/// * `name_or_id` - The name or ID of the container to check.
///
/// # Returns
///
/// * `Result<bool>` - `Ok(true)` if the container exists, `Ok(false)` if it
///   does not (404), or an `Err` for other Docker API communication issues.
#[instrument(skip(name_or_id), fields(container = %name_or_id))]
pub async fn container_exists(name_or_id: &str) -> Result<bool> {
    let docker = connect_docker().await?;
    debug!("Checking existence for container: {}", name_or_id);

    match docker
        .inspect_container(name_or_id, None::<InspectContainerOptions>)
        .await
    {
        Ok(_) => Ok(true),
        Err(bollard::errors::Error::DockerResponseServerError {
            status_code: 404, ..
        }) => {
            debug!("Container '{}' does not exist (404).", name_or_id);
            Ok(false)
        }
        Err(e) => {
            error!(
                "Failed to inspect container '{}' during existence check: {:?}",
                name_or_id, e
            );
            Err(anyhow!(HarnessError::DockerApi { source: e })
                .context(format!("Failed to inspect container '{}'", name_or_id)))
        }
    }
}

/// Inspects a container by name or ID to retrieve detailed information.
///
/// # Errors
///
/// * `HarnessError::ContainerNotFound` - If the container doesn't exist (maps Docker 404).
/// * `HarnessError::DockerApi` - For other errors during communication with the Docker daemon.
#[instrument(skip(name_or_id), fields(container = %name_or_id))]
pub async fn inspect_container(name_or_id: &str) -> Result<ContainerInspectResponse> {
    let docker = connect_docker().await?;
    debug!("Inspecting container: {}", name_or_id);

    docker
        .inspect_container(name_or_id, None::<InspectContainerOptions>)
        .await
        .map_err(|e| match e {
            bollard::errors::Error::DockerResponseServerError {
                status_code: 404, ..
            } => {
                warn!(
                    "Inspection failed because container '{}' was not found.",
                    name_or_id
                );
                anyhow!(HarnessError::ContainerNotFound {
                    name: name_or_id.to_string()
                })
            }
            _ => {
                error!("Failed to inspect container '{}': {:?}", name_or_id, e);
                anyhow!(HarnessError::DockerApi { source: e })
                    .context(format!("Failed to inspect container '{}'", name_or_id))
            }
        })
}

/// Checks if a container identified by name or ID is currently in the
/// 'running' state.
///
/// Inspects the container and checks the `State.Status` field; a container
/// that does not exist is reported as not running rather than as an error.
///
/// # Returns
///
/// * `Result<bool>` - `Ok(true)` if the container exists and its status is
///   `RUNNING`, `Ok(false)` otherwise (stopped or missing).
#[instrument(skip(name_or_id), fields(container = %name_or_id))]
pub async fn container_running(name_or_id: &str) -> Result<bool> {
    debug!("Checking running status for container: {}", name_or_id);

    match inspect_container(name_or_id).await {
        Ok(details) => {
            let is_running = details
                .state
                .is_some_and(|s| s.status == Some(ContainerStateStatusEnum::RUNNING));
            debug!("Container '{}' running status: {}", name_or_id, is_running);
            Ok(is_running)
        }
        Err(e)
            if e.downcast_ref::<HarnessError>()
                .is_some_and(|err| matches!(err, HarnessError::ContainerNotFound { .. })) =>
        {
            debug!("Container '{}' not found, thus not running.", name_or_id);
            Ok(false)
        }
        Err(e) => {
            error!(
                "Error checking running status for container '{}': {:?}",
                name_or_id, e
            );
            Err(e)
        }
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    /// Requires a running Docker daemon; a container name this unlikely should
    /// report absent rather than erroring.
    #[tokio::test]
    #[ignore] // Requires a running Docker daemon.
    async fn test_missing_container_reports_absent() {
        let exists = container_exists("clharness-definitely-not-a-container")
            .await
            .expect("existence check should succeed against a live daemon");
        assert!(!exists);

        let running = container_running("clharness-definitely-not-a-container")
            .await
            .expect("running check should succeed against a live daemon");
        assert!(!running);
    }
}
