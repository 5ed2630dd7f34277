//! Wound track stored opaquely per character.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WoundLevel {
    #[default]
    Healthy,
    Stunned,
    Wounded,
    Incapacitated,
    MortallyWounded,
    Dead,
}

impl WoundLevel {
    const ORDER: [WoundLevel; 6] = [
        WoundLevel::Healthy,
        WoundLevel::Stunned,
        WoundLevel::Wounded,
        WoundLevel::Incapacitated,
        WoundLevel::MortallyWounded,
        WoundLevel::Dead,
    ];

    /// Map the 0..=5 numeric level used by chat commands.
    pub fn from_level(level: u8) -> Result<Self, DomainError> {
        Self::ORDER
            .get(level as usize)
            .copied()
            .ok_or_else(|| DomainError::validation("Wound level must be 0-5"))
    }

    pub fn is_dead(self) -> bool {
        self == WoundLevel::Dead
    }
}

impl fmt::Display for WoundLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WoundLevel::Healthy => "healthy",
            WoundLevel::Stunned => "stunned",
            WoundLevel::Wounded => "wounded",
            WoundLevel::Incapacitated => "incapacitated",
            WoundLevel::MortallyWounded => "mortally_wounded",
            WoundLevel::Dead => "dead",
        };
        write!(f, "{label}")
    }
}
