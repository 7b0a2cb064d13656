//! # Client Command Vocabulary
//!
//! File: harness/src/client/command.rs
//!
//! ## Overview
//!
//! The closed set of client commands the harness knows how to parse output
//! for. Modeling the vocabulary as an enum (rather than dispatching on raw
//! strings) makes the parser dispatch exhaustively checked at compile time;
//! commands outside the vocabulary travel through `Other` and have their
//! output returned as verbatim text.
//!
use std::fmt;

/// A command of the external client's vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    /// Submit and queue a deploy in one step.
    Deploy,
    /// Produce a deploy as a binary payload on stdout.
    MakeDeploy,
    /// Sign a binary deploy payload.
    SignDeploy,
    /// Submit a previously made deploy.
    SendDeploy,
    /// Propose a block from queued deploys.
    Propose,
    ShowBlock,
    ShowBlocks,
    ShowDeploy,
    ShowDeploys,
    QueryState,
    /// Any command outside the known vocabulary; its output is returned as
    /// decoded text.
    Other(String),
}

impl ClientCommand {
    /// The command token as spelled on the client's command line.
    pub fn name(&self) -> &str {
        match self {
            ClientCommand::Deploy => "deploy",
            ClientCommand::MakeDeploy => "make-deploy",
            ClientCommand::SignDeploy => "sign-deploy",
            ClientCommand::SendDeploy => "send-deploy",
            ClientCommand::Propose => "propose",
            ClientCommand::ShowBlock => "show-block",
            ClientCommand::ShowBlocks => "show-blocks",
            ClientCommand::ShowDeploy => "show-deploy",
            ClientCommand::ShowDeploys => "show-deploys",
            ClientCommand::QueryState => "query-state",
            ClientCommand::Other(name) => name,
        }
    }

    /// Maps a command-line token back into the vocabulary.
    pub fn from_name(name: &str) -> Self {
        match name {
            "deploy" => ClientCommand::Deploy,
            "make-deploy" => ClientCommand::MakeDeploy,
            "sign-deploy" => ClientCommand::SignDeploy,
            "send-deploy" => ClientCommand::SendDeploy,
            "propose" => ClientCommand::Propose,
            "show-block" => ClientCommand::ShowBlock,
            "show-blocks" => ClientCommand::ShowBlocks,
            "show-deploy" => ClientCommand::ShowDeploy,
            "show-deploys" => ClientCommand::ShowDeploys,
            "query-state" => ClientCommand::QueryState,
            other => ClientCommand::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ClientCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_names_round_trip() {
        for name in [
            "deploy",
            "make-deploy",
            "sign-deploy",
            "send-deploy",
            "propose",
            "show-block",
            "show-blocks",
            "show-deploy",
            "show-deploys",
            "query-state",
        ] {
            let command = ClientCommand::from_name(name);
            assert!(!matches!(command, ClientCommand::Other(_)), "{name}");
            assert_eq!(command.name(), name);
        }
    }

    #[test]
    fn test_unknown_name_becomes_other() {
        let command = ClientCommand::from_name("keygen");
        assert_eq!(command, ClientCommand::Other("keygen".to_string()));
        assert_eq!(command.name(), "keygen");
        assert_eq!(command.to_string(), "keygen");
    }
}
