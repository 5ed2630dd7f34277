//! Turn and mode events

use chrono::{DateTime, Utc};

use crate::entities::SkipOutcome;
use crate::value_objects::{CharacterName, GameMode, MapId, ModeTransition};

/// The turn pointer moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnAdvanced {
    pub previous: CharacterName,
    pub current: CharacterName,
    pub round: u32,
    pub deadline: DateTime<Utc>,
    /// Set when the active map followed the new combatant's token
    pub map_switched_to: Option<MapId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatStarted {
    pub order: Vec<CharacterName>,
    pub current: CharacterName,
    pub round: u32,
    pub deadline: DateTime<Utc>,
    pub map_switched_to: Option<MapId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatEnded {
    /// False when there was no initiative to clear
    pub cleared: bool,
    pub mode: GameMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeChanged {
    pub from: GameMode,
    pub to: GameMode,
    pub transition: ModeTransition,
}

/// Result of the periodic timer check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoAdvanceOutcome {
    /// Nothing to time: no combat is running
    NotInCombat,
    /// Deadline still in the future; nothing changed
    NotExpired {
        current: CharacterName,
        remaining_secs: i64,
    },
    /// Deadline passed and the turn moved on
    Advanced {
        advance: TurnAdvanced,
        /// None when the timed-out combatant acted, or is not a participant
        skipped: Option<SkipOutcome>,
    },
}
