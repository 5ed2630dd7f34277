//! Character points, force points, wounds and the dice log.

use std::sync::Arc;

use gamenight_domain::{
    bounded_text, CharacterName, DiceLogEntry, DomainError, Participant, WoundLevel,
    WoundRecorded, MAX_NARRATION,
};

use crate::error::EngineError;
use crate::infrastructure::ports::ClockPort;
use crate::infrastructure::StateStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointChange {
    AwardCharacterPoints(u32),
    SpendCharacterPoints(u32),
    SpendForcePoint,
}

/// Award or spend points. Returns the participant with updated balances.
pub struct AdjustPoints {
    store: Arc<StateStore>,
    clock: Arc<dyn ClockPort>,
}

impl AdjustPoints {
    pub fn new(store: Arc<StateStore>, clock: Arc<dyn ClockPort>) -> Self {
        Self { store, clock }
    }

    pub async fn execute(
        &self,
        character: CharacterName,
        change: PointChange,
    ) -> Result<Participant, EngineError> {
        let now = self.clock.now();
        let participant = self
            .store
            .mutate_checked(|record| {
                match change {
                    PointChange::AwardCharacterPoints(points) => {
                        record.award_character_points(&character, points, now)?
                    }
                    PointChange::SpendCharacterPoints(points) => {
                        record.spend_character_points(&character, points, now)?
                    }
                    PointChange::SpendForcePoint => record.spend_force_points(&character, now)?,
                };
                record
                    .participant(&character)
                    .cloned()
                    .ok_or_else(|| DomainError::not_found("Character", character.as_str()).into())
            })
            .await?;
        tracing::info!(
            character = %character,
            change = ?change,
            character_points = participant.character_points(),
            force_points = participant.force_points(),
            "Points adjusted"
        );
        Ok(participant)
    }
}

pub struct RecordWound {
    store: Arc<StateStore>,
    clock: Arc<dyn ClockPort>,
}

impl RecordWound {
    pub fn new(store: Arc<StateStore>, clock: Arc<dyn ClockPort>) -> Self {
        Self { store, clock }
    }

    pub async fn execute(
        &self,
        character: CharacterName,
        level: WoundLevel,
    ) -> Result<WoundRecorded, EngineError> {
        let now = self.clock.now();
        let recorded = self
            .store
            .mutate_checked(|record| Ok(record.record_wound(character, level, now)?))
            .await?;
        tracing::info!(
            character = %recorded.character,
            level = %recorded.level,
            npc = recorded.npc,
            "Wound recorded"
        );
        Ok(recorded)
    }
}

/// Append a roll to the short dice log the overlay animates.
pub struct LogDice {
    store: Arc<StateStore>,
    clock: Arc<dyn ClockPort>,
}

/// Parameters of a roll made by the external dice roller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceRoll {
    pub character: CharacterName,
    pub skill: String,
    pub total: i32,
    pub detail: String,
    pub difficulty: Option<i32>,
    pub success: Option<bool>,
}

impl LogDice {
    pub fn new(store: Arc<StateStore>, clock: Arc<dyn ClockPort>) -> Self {
        Self { store, clock }
    }

    /// Returns how many rolls the log now holds.
    pub async fn execute(&self, roll: DiceRoll) -> Result<usize, EngineError> {
        let now = self.clock.now();
        let skill = bounded_text("Skill", roll.skill, MAX_NARRATION)?;
        if skill.is_empty() {
            return Err(DomainError::validation("Skill cannot be empty").into());
        }
        let entry = DiceLogEntry {
            character_name: roll.character,
            skill,
            total: roll.total,
            detail: bounded_text("Roll detail", roll.detail, MAX_NARRATION)?,
            difficulty: roll.difficulty,
            success: roll.success,
            timestamp: now,
        };
        let character = entry.character_name.clone();
        let kept = self
            .store
            .mutate_checked(|record| {
                record.log_dice(entry, now)?;
                Ok(record.dice_log().len())
            })
            .await?;
        tracing::debug!(character = %character, total = roll.total, "Dice logged");
        Ok(kept)
    }
}
