//! # Client Output Parsing
//!
//! File: harness/src/client/output.rs
//!
//! ## Overview
//!
//! Turns a successful invocation's raw stdout into a `CommandOutcome` the
//! test suite can assert on. The dispatch is an exhaustive match over
//! `ClientCommand`:
//!
//! | command | behavior |
//! |---|---|
//! | `make-deploy`, `sign-deploy` | raw bytes unchanged (binary payload) |
//! | `send-deploy` | decode UTF-8; 3rd whitespace token |
//! | `deploy`, `propose` | decode UTF-8; 4th whitespace token |
//! | `show-blocks` | decode UTF-8; block-listing grammar |
//! | `show-deploys` | decode UTF-8; deploy-listing grammar |
//! | `show-deploy`, `show-block`, `query-state` | decode UTF-8; key/value grammar |
//! | anything else | decode UTF-8; verbatim text |
//!
//! The positional extractions rely on the client printing fixed-format
//! confirmation lines ("Success! Deploy <id> sent." and friends). When the
//! line is shorter than the format promises, that is a contract break with
//! the external tool: the extraction fails loudly with `MalformedOutput`
//! rather than silently returning an empty value.
//!
use crate::client::command::ClientCommand;
use crate::client::grammar;
use crate::core::error::{HarnessError, Result};
use anyhow::anyhow;
use serde_json::Value;
use std::fmt;

/// Structured or raw value produced by parsing a successful invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// Binary payload, byte-for-byte as the client wrote it.
    Bytes(Vec<u8>),
    /// A deploy/block identifier extracted from a confirmation line.
    Identifier(String),
    /// Parsed block listing.
    Blocks(Vec<Value>),
    /// Parsed deploy listing.
    Deploys(Vec<Value>),
    /// Parsed key/value tree.
    Structured(Value),
    /// Decoded text, verbatim.
    Text(String),
}

/// Best-effort rendering of stdout carried on the error path: decoded text
/// when stdout is valid UTF-8, the raw bytes otherwise. Error reporting must
/// never itself fail on a decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawOutput {
    Text(String),
    Bytes(Vec<u8>),
}

impl RawOutput {
    /// Decodes when possible, keeps the bytes when not.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) => RawOutput::Text(text),
            Err(err) => RawOutput::Bytes(err.into_bytes()),
        }
    }

    /// The underlying bytes, whichever variant holds them.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            RawOutput::Text(text) => text.as_bytes(),
            RawOutput::Bytes(bytes) => bytes,
        }
    }
}

impl fmt::Display for RawOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawOutput::Text(text) => f.write_str(text),
            RawOutput::Bytes(bytes) => write!(f, "{}", String::from_utf8_lossy(bytes)),
        }
    }
}

/// Dispatches raw stdout to the parsing strategy for `command`.
///
/// # Errors
///
/// * `HarnessError::OutputDecode` - stdout of a text command is not valid UTF-8.
/// * `HarnessError::MalformedOutput` - a confirmation line is missing the expected token.
/// * `HarnessError::Grammar` - the structured-output grammar rejected the text.
pub fn parse_output(command: &ClientCommand, stdout: Vec<u8>) -> Result<CommandOutcome> {
    match command {
        ClientCommand::MakeDeploy | ClientCommand::SignDeploy => Ok(CommandOutcome::Bytes(stdout)),
        ClientCommand::SendDeploy => Ok(CommandOutcome::Identifier(nth_token(
            &decode(stdout)?,
            2,
            command,
        )?)),
        ClientCommand::Deploy | ClientCommand::Propose => Ok(CommandOutcome::Identifier(
            nth_token(&decode(stdout)?, 3, command)?,
        )),
        ClientCommand::ShowBlocks => Ok(CommandOutcome::Blocks(grammar::parse_show_blocks(
            &decode(stdout)?,
        )?)),
        ClientCommand::ShowDeploys => Ok(CommandOutcome::Deploys(grammar::parse_show_deploys(
            &decode(stdout)?,
        )?)),
        ClientCommand::ShowDeploy | ClientCommand::ShowBlock | ClientCommand::QueryState => Ok(
            CommandOutcome::Structured(grammar::parse(&decode(stdout)?)?),
        ),
        ClientCommand::Other(_) => Ok(CommandOutcome::Text(decode(stdout)?)),
    }
}

fn decode(stdout: Vec<u8>) -> Result<String> {
    String::from_utf8(stdout).map_err(|source| anyhow!(HarnessError::OutputDecode { source }))
}

/// Extracts the whitespace-separated token at `index` (0-based).
fn nth_token(text: &str, index: usize, command: &ClientCommand) -> Result<String> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    match tokens.get(index) {
        Some(token) => Ok((*token).to_string()),
        None => Err(anyhow!(HarnessError::MalformedOutput {
            command: command.name().to_string(),
            expected: index + 1,
            actual: tokens.len(),
        })),
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_deploy_takes_third_token() {
        let outcome = parse_output(
            &ClientCommand::SendDeploy,
            b"Success! Deploy abc123 sent.".to_vec(),
        )
        .expect("parse confirmation line");
        assert_eq!(outcome, CommandOutcome::Identifier("abc123".to_string()));
    }

    #[test]
    fn test_deploy_and_propose_take_fourth_token() {
        for command in [ClientCommand::Deploy, ClientCommand::Propose] {
            let outcome = parse_output(&command, b"Success! Block deploy xyz789 queued.".to_vec())
                .expect("parse confirmation line");
            assert_eq!(outcome, CommandOutcome::Identifier("xyz789".to_string()));
        }
    }

    #[test]
    fn test_binary_commands_pass_bytes_through() {
        let payload = vec![0u8, 159, 146, 150, 255];
        for command in [ClientCommand::MakeDeploy, ClientCommand::SignDeploy] {
            let outcome =
                parse_output(&command, payload.clone()).expect("binary payload passes through");
            assert_eq!(outcome, CommandOutcome::Bytes(payload.clone()));
        }
    }

    #[test]
    fn test_unknown_command_returns_decoded_text() {
        let text = "Usage: client [OPTIONS]\n";
        let outcome = parse_output(
            &ClientCommand::Other("keygen".to_string()),
            text.as_bytes().to_vec(),
        )
        .expect("text passes through");
        assert_eq!(outcome, CommandOutcome::Text(text.to_string()));
    }

    #[test]
    fn test_short_confirmation_line_fails_loudly() {
        let err = parse_output(&ClientCommand::SendDeploy, b"Failure!".to_vec())
            .expect_err("too few tokens must not parse");
        let harness_err = err
            .downcast_ref::<HarnessError>()
            .expect("typed harness error");
        assert!(matches!(
            harness_err,
            HarnessError::MalformedOutput {
                expected: 3,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_utf8_on_text_command_is_a_decode_error() {
        let err = parse_output(
            &ClientCommand::Other("version".to_string()),
            vec![0xff, 0xfe],
        )
        .expect_err("invalid UTF-8 must not decode");
        assert!(err
            .downcast_ref::<HarnessError>()
            .is_some_and(|e| matches!(e, HarnessError::OutputDecode { .. })));
    }

    #[test]
    fn test_raw_output_degrades_to_bytes() {
        let invalid = vec![0xff, 0xfe, b' ', b'b', b'a', b'd'];
        assert_eq!(
            RawOutput::from_bytes(invalid.clone()),
            RawOutput::Bytes(invalid)
        );
        assert_eq!(
            RawOutput::from_bytes(b"fine".to_vec()),
            RawOutput::Text("fine".to_string())
        );
    }

    #[test]
    fn test_raw_output_display_is_lossy_for_bytes() {
        let raw = RawOutput::from_bytes(vec![0xff, b'x']);
        // Display never fails; invalid sequences render as replacement chars.
        assert!(raw.to_string().contains('x'));
    }
}
