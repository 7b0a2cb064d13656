//! # Harness Error Types
//!
//! File: harness/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types and error handling mechanisms used
//! throughout the harness. It provides a consistent approach to error
//! management with detailed error information and context.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `HarnessError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! The error types cover the failure domains of a client invocation:
//! - Nonzero client exit (`ClientExit`, carrying the full process result)
//! - Output contract breaks (`MalformedOutput`, `OutputDecode`, `Grammar`)
//! - Docker interaction errors for the in-container backend
//! - Configuration errors
//!
//! Typed variants are wrapped in `anyhow::Error` at the call sites and
//! recovered by downcast where a test needs to inspect them:
//!
//! ```text
//! match driver.call(command, args).await {
//!     Ok(outcome) => ...,
//!     Err(e) if e.downcast_ref::<HarnessError>()
//!         .is_some_and(|he| matches!(he, HarnessError::ClientExit { .. })) => ...,
//!     Err(e) => return Err(e),
//! }
//! ```
//!
use crate::client::backend::InvocationResult;
use crate::client::output::RawOutput;
use thiserror::Error;

/// Custom error type for the invocation harness.
// No PartialEq derive because the bollard source field doesn't implement it.
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Docker API interaction failed: {source}")]
    DockerApi {
        #[from]
        source: bollard::errors::Error,
    },

    #[error("Container '{name}' not found.")]
    ContainerNotFound { name: String },

    #[error("Container '{name}' is not running.")]
    ContainerNotRunning { name: String },

    /// Nonzero client exit. Only constructed when the exit code is nonzero;
    /// `output` is a best-effort decoding of the captured stdout.
    #[error("Client exited with code {}: {}", .result.exit_code, .output)]
    ClientExit {
        result: InvocationResult,
        output: RawOutput,
    },

    /// The client printed fewer whitespace-separated tokens than the fixed
    /// confirmation-line format promises. Signals a contract break with the
    /// external tool and is never masked.
    #[error("Malformed '{command}' output: expected at least {expected} whitespace-separated tokens, found {actual}")]
    MalformedOutput {
        command: String,
        expected: usize,
        actual: usize,
    },

    #[error("Client output is not valid UTF-8: {source}")]
    OutputDecode {
        #[from]
        source: std::string::FromUtf8Error,
    },

    #[error("Unparseable structured output at line {line}: {message}")]
    Grammar { line: usize, message: String },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
/// Anyhow allows for easy context addition and flexible error handling.
pub type Result<T> = anyhow::Result<T>;
