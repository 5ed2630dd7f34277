//! Unified error types for the domain layer
//!
//! Every rejection a command can produce before touching storage lives here,
//! so the engine can map them onto the wire taxonomy without string matching.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Bad argument shape or a value outside its allowed range
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Entity not found
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Combat turn enforcement rejected the action
    #[error("{message}")]
    NotYourTurn { current: String, message: String },

    /// A cutscene is running and only the narrator may act
    #[error("The narrator is speaking - please wait")]
    NarratorOnly,

    /// Named position does not exist on the map
    #[error("Unknown position '{position}' on {map}. Available: {}", valid.join(", "))]
    UnknownPosition {
        map: String,
        position: String,
        valid: Vec<String>,
    },

    /// No way to land a token on the destination map
    #[error("No connection from '{from_map}' to '{to_map}' and no position given")]
    NoConnection { from_map: String, to_map: String },

    /// Mode change not in the transition table
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    /// A condition that should be unreachable was observed in the record
    #[error("State invariant violated: {0}")]
    InvariantViolation(String),

    /// No session has been initialised, or the last one has ended
    #[error("No active session. Run 'init' first.")]
    NoActiveSession,
}

impl DomainError {
    /// Creates a validation error for malformed or out-of-range input.
    ///
    /// # Example
    /// ```ignore
    /// if order.is_empty() {
    ///     return Err(DomainError::validation("Initiative order cannot be empty"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Create a turn enforcement rejection naming whose turn it is.
    pub fn not_your_turn(current: impl Into<String>) -> Self {
        let current = current.into();
        Self::NotYourTurn {
            message: format!("Not your turn - it's {current}'s turn."),
            current,
        }
    }

    /// Create an invalid state transition error
    pub fn invalid_state_transition(msg: impl Into<String>) -> Self {
        Self::InvalidStateTransition(msg.into())
    }

    /// Create an invariant violation error
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    /// Returns true for rejections that are part of normal play.
    ///
    /// Turn and mode enforcement fire constantly while chat is busy, so callers
    /// log these at debug level instead of treating them as anomalies.
    pub fn is_expected_rejection(&self) -> bool {
        matches!(self, Self::NotYourTurn { .. } | Self::NarratorOnly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_your_turn_names_current_character() {
        let err = DomainError::not_your_turn("Kira");
        assert_eq!(err.to_string(), "Not your turn - it's Kira's turn.");
        assert!(matches!(err, DomainError::NotYourTurn { ref current, .. } if current == "Kira"));
    }

    #[test]
    fn unknown_position_lists_alternatives() {
        let err = DomainError::UnknownPosition {
            map: "cantina.svg".to_string(),
            position: "nowhere".to_string(),
            valid: vec!["bar-stool-l3".to_string(), "entrance".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Unknown position 'nowhere' on cantina.svg. Available: bar-stool-l3, entrance"
        );
    }

    #[test]
    fn only_turn_rejections_are_expected() {
        assert!(DomainError::NarratorOnly.is_expected_rejection());
        assert!(DomainError::not_your_turn("Kira").is_expected_rejection());
        assert!(!DomainError::validation("bad").is_expected_rejection());
        assert!(!DomainError::invariant("pointer").is_expected_rejection());
    }
}
