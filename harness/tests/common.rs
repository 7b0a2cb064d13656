//! # Harness Integration Test Common Helpers
//!
//! File: harness/tests/common.rs
//!
//! ## Overview
//!
//! Shared utility functions used across the integration test files. The
//! local-backend tests drive the full call contract against a scratch shell
//! script standing in for the real client binary, so each test controls
//! exactly what "the client" prints and how it exits.
//!

// Allow potentially unused code in this common module, as different test
// files use different helpers.
#![allow(dead_code)]

use clharness::{ClientConfig, NodeEndpoint};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

/// Writes an executable `/bin/sh` script into `dir` and returns its path.
///
/// The body runs with the built argument vector in `$@`, so scripts can echo
/// their arguments back to let tests observe exactly what was invoked.
pub fn write_fake_client(dir: &Path, body: &str) -> String {
    let path = dir.join("fake_client.sh");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write fake client script");
    let mut perms = fs::metadata(&path)
        .expect("stat fake client script")
        .permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("chmod fake client script");
    path.to_string_lossy().into_owned()
}

/// The endpoint used by the integration tests.
pub fn test_node() -> NodeEndpoint {
    NodeEndpoint::new("node-0", 40401, 40401)
}

/// A default configuration pointed at the given client binary.
pub fn config_for(client_cmd: &str) -> ClientConfig {
    ClientConfig {
        client_cmd: client_cmd.to_string(),
        ..ClientConfig::default()
    }
}
