//! Append-only action history and the short dice log.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::ActionId;
use crate::value_objects::{CharacterName, ViewerId};

/// Cap on free-text action summaries.
pub const MAX_ACTION_TEXT: usize = 500;

/// Number of dice rolls kept in the record.
pub const DICE_LOG_CAPACITY: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Say,
    #[default]
    Do,
}

impl FromStr for ActionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "say" => Ok(ActionKind::Say),
            "do" => Ok(ActionKind::Do),
            other => Err(DomainError::validation(format!(
                "Unknown action kind '{other}' (expected say or do)"
            ))),
        }
    }
}

/// One accepted action. Entries are only ever appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionLogEntry {
    pub id: ActionId,
    pub character_name: CharacterName,
    /// None when the narrator acted
    pub viewer: Option<ViewerId>,
    #[serde(default)]
    pub kind: ActionKind,
    pub summary: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceLogEntry {
    pub character_name: CharacterName,
    pub skill: String,
    pub total: i32,
    #[serde(default)]
    pub detail: String,
    pub difficulty: Option<i32>,
    pub success: Option<bool>,
    pub timestamp: DateTime<Utc>,
}

/// Append a roll, dropping the oldest entries beyond capacity.
pub fn push_dice(log: &mut Vec<DiceLogEntry>, entry: DiceLogEntry) {
    log.push(entry);
    if log.len() > DICE_LOG_CAPACITY {
        let excess = log.len() - DICE_LOG_CAPACITY;
        log.drain(..excess);
    }
}
