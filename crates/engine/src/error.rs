//! Engine error - everything a command can fail with.

use serde_json::json;
use thiserror::Error;

use gamenight_domain::DomainError;
use gamenight_shared::{CommandFailure, ErrorKind};

use crate::infrastructure::ports::StorageError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl EngineError {
    /// Wire classification.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Domain(e) => match e {
                DomainError::NotYourTurn { .. } => ErrorKind::NotYourTurn,
                DomainError::NarratorOnly => ErrorKind::NarratorOnly,
                DomainError::UnknownPosition { .. } => ErrorKind::UnknownPosition,
                DomainError::NoConnection { .. } => ErrorKind::NoConnection,
                DomainError::InvariantViolation(_) => ErrorKind::StateInvariantViolation,
                DomainError::Validation(_)
                | DomainError::NotFound { .. }
                | DomainError::InvalidStateTransition(_)
                | DomainError::NoActiveSession => ErrorKind::ValidationError,
            },
            EngineError::Storage(_) => ErrorKind::StorageError,
        }
    }

    /// Turn and mode rejections; logged at debug, never as anomalies.
    pub fn is_expected(&self) -> bool {
        matches!(self, EngineError::Domain(e) if e.is_expected_rejection())
    }
}

impl From<&EngineError> for CommandFailure {
    fn from(err: &EngineError) -> Self {
        let kind = err.kind();
        match err {
            EngineError::Domain(DomainError::UnknownPosition {
                map,
                position,
                valid,
            }) => CommandFailure::new(kind, err.to_string()).with_details(json!({
                "map": map,
                "position": position,
                "valid": valid,
            })),
            EngineError::Domain(DomainError::NotYourTurn { current, .. }) => {
                CommandFailure::new(kind, err.to_string())
                    .with_details(json!({ "current": current }))
            }
            EngineError::Domain(DomainError::NoConnection { from_map, to_map }) => {
                CommandFailure::new(kind, err.to_string())
                    .with_details(json!({ "fromMap": from_map, "toMap": to_map }))
            }
            EngineError::Domain(DomainError::InvariantViolation(_)) => CommandFailure::new(
                kind,
                format!("{err}. Run end-combat to clear it."),
            ),
            EngineError::Storage(_) => CommandFailure::new(
                kind,
                format!("Could not save the session, please retry ({err})"),
            ),
            EngineError::Domain(_) => CommandFailure::new(kind, err.to_string()),
        }
    }
}

impl From<EngineError> for CommandFailure {
    fn from(err: EngineError) -> Self {
        CommandFailure::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_position_carries_valid_set() {
        let err = EngineError::from(DomainError::UnknownPosition {
            map: "cantina.svg".to_string(),
            position: "nonexistent-spot".to_string(),
            valid: vec!["bar-stool-l3".to_string(), "entrance".to_string()],
        });
        let failure = CommandFailure::from(&err);
        assert_eq!(failure.kind, ErrorKind::UnknownPosition);
        assert_eq!(
            failure.details.unwrap()["valid"],
            json!(["bar-stool-l3", "entrance"])
        );
    }

    #[test]
    fn lookups_and_transitions_are_validation_errors() {
        for e in [
            DomainError::not_found("Character", "Ghost"),
            DomainError::invalid_state_transition("rp -> rp"),
            DomainError::NoActiveSession,
        ] {
            assert_eq!(EngineError::from(e).kind(), ErrorKind::ValidationError);
        }
    }

    #[test]
    fn storage_failures_ask_for_retry() {
        let err = EngineError::from(StorageError::io("persist", "disk full"));
        let failure = CommandFailure::from(err);
        assert_eq!(failure.kind, ErrorKind::StorageError);
        assert!(failure.message.contains("please retry"));
    }

    #[test]
    fn only_turn_rejections_are_expected() {
        assert!(EngineError::from(DomainError::not_your_turn("Kira")).is_expected());
        assert!(!EngineError::from(DomainError::invariant("pointer")).is_expected());
    }
}
