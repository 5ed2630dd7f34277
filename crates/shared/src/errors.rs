//! Failure bodies returned to transports.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Machine-readable failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad argument shape, unknown character/map/position, or no session
    ValidationError,
    /// Combat turn enforcement
    NotYourTurn,
    /// Cutscene in progress
    NarratorOnly,
    /// Transfer without a position found no route
    NoConnection,
    /// Named position missing from the map's terrain
    UnknownPosition,
    /// The record could not be durably written; retry
    StorageError,
    /// Record is in a state no command can produce; `end-combat` clears it
    StateInvariantViolation,
}

impl ErrorKind {
    /// Rejections that are part of normal play.
    pub fn is_expected(self) -> bool {
        matches!(self, ErrorKind::NotYourTurn | ErrorKind::NarratorOnly)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::ValidationError => "validation_error",
            ErrorKind::NotYourTurn => "not_your_turn",
            ErrorKind::NarratorOnly => "narrator_only",
            ErrorKind::NoConnection => "no_connection",
            ErrorKind::UnknownPosition => "unknown_position",
            ErrorKind::StorageError => "storage_error",
            ErrorKind::StateInvariantViolation => "state_invariant_violation",
        };
        write!(f, "{s}")
    }
}

/// A failed command: the kind, a message fit for chat, and optional
/// structured details (valid positions, whose turn it is).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandFailure {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl CommandFailure {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl fmt::Display for CommandFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for CommandFailure {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_snake_case_kind_and_skips_empty_details() {
        let failure = CommandFailure::new(ErrorKind::NotYourTurn, "Not your turn - it's Kira's turn.");
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["kind"], "not_your_turn");
        assert!(json.get("details").is_none());
        assert_eq!(ErrorKind::StateInvariantViolation.to_string(), "state_invariant_violation");
    }
}
