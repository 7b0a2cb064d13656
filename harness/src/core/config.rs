//! # Harness Configuration System
//!
//! File: harness/src/core/config.rs
//!
//! ## Overview
//!
//! This module implements the configuration system for the harness, handling
//! loading, merging, validation, and access to configuration data. It supports
//! a multi-level configuration approach that combines defaults, user settings,
//! and project-specific overrides, with environment variables applied last.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence, later wins):
//! 1. Default values defined in the code
//! 2. User-specific `~/.config/clharness/config.toml`
//! 3. Project-specific `.clharness.toml` in the current directory or ancestors
//! 4. Environment variables (`CL_CLIENT_BIN`, `TAG_NAME`)
//!
//! Paths in the TLS section are expanded (`~` to home directory), and the
//! merged configuration is validated before use.
//!
//! The `TAG_NAME` marker deserves a note: test suites run the client two ways.
//! In tagged/released builds the client runs inside the same docker network as
//! the node, so the node's container identity is a reachable hostname; in
//! local/dev mode the client runs on the host against published ports. A
//! non-empty `TAG_NAME` selects the former. The marker is captured once at
//! load time into `ClientConfig::tagged_mode`, so host resolution never reads
//! the environment mid-run.
//!
use crate::core::error::{HarnessError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Default name of the external client binary.
pub const DEFAULT_CLIENT_CMD: &str = "casperlabs_client";
/// Default name of the flag used to pass the TLS certificate to the client.
pub const DEFAULT_TLS_PARAMETER_NAME: &str = "--certificate-file";
/// Environment marker selecting tagged/released mode.
pub const TAG_NAME_VAR: &str = "TAG_NAME";
/// Environment override for the client binary name.
pub const CLIENT_CMD_VAR: &str = "CL_CLIENT_BIN";

const PROJECT_CONFIG_FILENAME: &str = ".clharness.toml";

/// TLS parameter injected into the client argument vector when present.
///
/// The parameter name defaults to `--certificate-file` but is configurable,
/// since some client builds expose the certificate under a different flag.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TlsConfig {
    /// Flag name passed before the value (e.g. `--certificate-file`).
    #[serde(default = "default_tls_parameter_name")]
    pub parameter_name: String,
    /// Flag value, typically a certificate path. `~` is expanded at load time.
    pub value: String,
}

impl TlsConfig {
    /// A TLS parameter under the default flag name.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            parameter_name: default_tls_parameter_name(),
            value: value.into(),
        }
    }
}

/// Represents the harness configuration, loaded from TOML files.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Name of (or path to) the external client binary.
    #[serde(default = "default_client_cmd")]
    pub client_cmd: String,
    /// Optional TLS parameter appended after the connection arguments.
    #[serde(default)]
    pub tls: Option<TlsConfig>,
    /// Whether the `TAG_NAME` marker was set at load time. Not read from
    /// files; captured from the environment only.
    #[serde(skip)]
    pub tagged_mode: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            client_cmd: default_client_cmd(),
            tls: None,
            tagged_mode: false,
        }
    }
}

fn default_client_cmd() -> String {
    DEFAULT_CLIENT_CMD.to_string()
}
fn default_tls_parameter_name() -> String {
    DEFAULT_TLS_PARAMETER_NAME.to_string()
}

impl ClientConfig {
    /// Loads the harness configuration from all sources.
    ///
    /// Merges user and project files over the defaults, applies environment
    /// overrides, expands paths, and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an `Err` if a configuration file exists but cannot be read or
    /// parsed, or if the merged configuration fails validation.
    pub fn load() -> Result<Self> {
        let user_config = load_user_config()?;
        let project_config = load_project_config()?;
        let mut merged = merge_configs(user_config.unwrap_or_default(), project_config);
        apply_env_overrides(&mut merged);
        expand_config_paths(&mut merged);
        validate_config(&merged).context("Configuration validation failed")?;
        debug!("Final loaded configuration: {:?}", merged);
        Ok(merged)
    }
}

fn load_user_config() -> Result<Option<ClientConfig>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "CLHarness", "clharness") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<ClientConfig>> {
    if let Some(project_config_path) = find_project_config_path()? {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!(
            "No project configuration file ({}) found in current directory or ancestors.",
            PROJECT_CONFIG_FILENAME
        );
        Ok(None)
    }
}

fn find_project_config_path() -> Result<Option<PathBuf>> {
    let current_dir = env::current_dir().context("Failed to get current directory")?;
    let mut path: &Path = &current_dir;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        let git_dir = path.join(".git");
        if project_config.exists() && project_config.is_file() {
            return Ok(Some(project_config));
        }
        // Stop the upward search at the repository boundary.
        if git_dir.exists() && git_dir.is_dir() {
            return Ok(None);
        }
        match path.parent() {
            Some(parent) => path = parent,
            None => break,
        }
    }
    Ok(None)
}

fn load_config_from_path(path: &Path) -> Result<ClientConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Merges the project configuration over the user configuration.
/// Project values win where they diverge from the defaults.
fn merge_configs(user: ClientConfig, project: Option<ClientConfig>) -> ClientConfig {
    let project_cfg = match project {
        Some(p) => p,
        None => return user,
    };
    let mut merged = ClientConfig::default();
    merged.client_cmd = if project_cfg.client_cmd != default_client_cmd() {
        project_cfg.client_cmd
    } else {
        user.client_cmd
    };
    merged.tls = project_cfg.tls.or(user.tls);
    merged
}

fn apply_env_overrides(config: &mut ClientConfig) {
    if let Ok(client_cmd) = env::var(CLIENT_CMD_VAR) {
        if !client_cmd.is_empty() {
            debug!("Overriding client_cmd from {}: {}", CLIENT_CMD_VAR, client_cmd);
            config.client_cmd = client_cmd;
        }
    }
    config.tagged_mode = tagged_mode_from_env();
}

/// Reads the `TAG_NAME` marker from the environment. Empty counts as unset.
pub fn tagged_mode_from_env() -> bool {
    tagged_from_marker(env::var(TAG_NAME_VAR).ok().as_deref())
}

fn tagged_from_marker(marker: Option<&str>) -> bool {
    marker.is_some_and(|value| !value.is_empty())
}

fn expand_config_paths(config: &mut ClientConfig) {
    if let Some(tls) = &mut config.tls {
        tls.value = shellexpand::tilde(&tls.value).into_owned();
    }
}

fn validate_config(config: &ClientConfig) -> Result<()> {
    if config.client_cmd.trim().is_empty() {
        return Err(anyhow!(HarnessError::Config(
            "client_cmd must not be empty".to_string()
        )));
    }
    if let Some(tls) = &config.tls {
        if tls.parameter_name.trim().is_empty() {
            return Err(anyhow!(HarnessError::Config(
                "tls.parameter_name must not be empty".to_string()
            )));
        }
        if tls.value.trim().is_empty() {
            return Err(anyhow!(HarnessError::Config(
                "tls.value must not be empty".to_string()
            )));
        }
    }
    Ok(())
}
