//! SessionRecord aggregate - the single persisted session document.
//!
//! Every mutation the engine performs goes through a `&mut self` method on
//! this type, so the invariants below can only be broken by a hand-edited
//! file, never by a command.
//!
//! # Invariants
//!
//! - While the mode is `combat`, the initiative sequence is non-empty, the
//!   turn pointer is a valid index into it and a deadline is set.
//! - While the mode is `rp`, the initiative sequence is empty.
//! - Each character has at most one participant row and at most one token.
//! - A participant's activity status is a function of its skip count.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::initiative::{turn_timeout, TurnOrder};
use crate::entities::{
    ActionLogEntry, Camera, CharacterProgress, DiceLogEntry, NpcRecord, Participant, Session,
    Token,
};
use crate::error::DomainError;
use crate::value_objects::{AdventureId, CharacterName, GameMode, ViewerId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub(crate) session: Session,
    #[serde(default)]
    pub(crate) participants: Vec<Participant>,
    #[serde(flatten)]
    pub(crate) turn: TurnOrder,
    #[serde(default)]
    pub(crate) tokens: Vec<Token>,
    #[serde(default)]
    pub(crate) action_log: Vec<ActionLogEntry>,
    #[serde(default)]
    pub(crate) dice_log: Vec<DiceLogEntry>,
    #[serde(default)]
    pub(crate) npcs: Vec<NpcRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) camera: Option<Camera>,
}

impl SessionRecord {
    /// Start a session. Pre-generated characters join as bot-controlled
    /// participants that any viewer can take over.
    pub fn new(
        adventure: AdventureId,
        bot_characters: Vec<CharacterName>,
        turn_timeout_secs: u64,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let mut participants: Vec<Participant> = Vec::with_capacity(bot_characters.len());
        for name in bot_characters {
            if participants.iter().any(|p| p.character_name() == &name) {
                return Err(DomainError::validation(format!("{name} listed twice")));
            }
            participants.push(Participant::bot(name));
        }
        let turn = TurnOrder::idle(turn_timeout(turn_timeout_secs)?);
        Ok(Self {
            session: Session::new(adventure, now),
            participants,
            turn,
            tokens: Vec::new(),
            action_log: Vec::new(),
            dice_log: Vec::new(),
            npcs: Vec::new(),
            camera: None,
        })
    }

    /// Carry a character's counters over from earlier canon sessions.
    /// Returns false when the character has no participant row.
    pub fn restore_progress(&mut self, progress: &CharacterProgress) -> bool {
        match self.participant_mut(&progress.name) {
            Some(p) => {
                p.restore(progress);
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn mode(&self) -> GameMode {
        self.session.mode
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn participant(&self, character: &CharacterName) -> Option<&Participant> {
        self.participants
            .iter()
            .find(|p| p.character_name() == character)
    }

    pub(crate) fn participant_mut(&mut self, character: &CharacterName) -> Option<&mut Participant> {
        self.participants
            .iter_mut()
            .find(|p| p.character_name() == character)
    }

    pub(crate) fn require_participant_mut(
        &mut self,
        character: &CharacterName,
    ) -> Result<&mut Participant, DomainError> {
        self.participant_mut(character)
            .ok_or_else(|| DomainError::not_found("Character", character.as_str()))
    }

    /// The character `viewer` currently controls, if any.
    pub fn character_of(&self, viewer: &ViewerId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.is_controlled_by(viewer))
    }

    pub fn turn(&self) -> &TurnOrder {
        &self.turn
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token(&self, character: &CharacterName) -> Option<&Token> {
        self.tokens.iter().find(|t| &t.character_name == character)
    }

    pub fn action_log(&self) -> &[ActionLogEntry] {
        &self.action_log
    }

    /// The most recent `n` log entries, oldest first.
    pub fn recent_actions(&self, n: usize) -> &[ActionLogEntry] {
        let start = self.action_log.len().saturating_sub(n);
        &self.action_log[start..]
    }

    pub fn dice_log(&self) -> &[DiceLogEntry] {
        &self.dice_log
    }

    pub fn npcs(&self) -> &[NpcRecord] {
        &self.npcs
    }

    /// Overlay camera; `None` until something first aims it.
    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    // =========================================================================
    // Guards
    // =========================================================================

    pub fn ensure_active(&self) -> Result<(), DomainError> {
        if self.session.is_active() {
            Ok(())
        } else {
            Err(DomainError::NoActiveSession)
        }
    }

    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.session.last_updated = now;
    }

    /// Check the structural invariants. A violation refuses further mutation
    /// until `end-combat` clears the turn state.
    pub fn check_invariants(&self) -> Result<(), DomainError> {
        match self.session.mode {
            GameMode::Combat => {
                if self.turn.is_empty() {
                    return Err(DomainError::invariant("combat with an empty initiative sequence"));
                }
                if !self.turn.pointer_is_valid() {
                    return Err(DomainError::invariant(format!(
                        "turn pointer {:?} outside initiative of {}",
                        self.turn.current_index(),
                        self.turn.order().len()
                    )));
                }
                if self.turn.deadline().is_none() {
                    return Err(DomainError::invariant("combat turn without a deadline"));
                }
            }
            GameMode::Rp => {
                if !self.turn.is_empty() {
                    return Err(DomainError::invariant("initiative sequence outside combat"));
                }
            }
            GameMode::Cutscene => {
                if !self.turn.is_empty() && !self.turn.pointer_is_valid() {
                    return Err(DomainError::invariant(
                        "suspended initiative has an invalid turn pointer",
                    ));
                }
            }
        }

        for (i, p) in self.participants.iter().enumerate() {
            if self.participants[..i]
                .iter()
                .any(|q| q.character_name() == p.character_name())
            {
                return Err(DomainError::invariant(format!(
                    "duplicate participant {}",
                    p.character_name()
                )));
            }
            if !p.status_is_consistent() {
                return Err(DomainError::invariant(format!(
                    "{} has status {} with {} skips",
                    p.character_name(),
                    p.activity_status(),
                    p.skip_count()
                )));
            }
        }
        for (i, t) in self.tokens.iter().enumerate() {
            if self.tokens[..i]
                .iter()
                .any(|u| u.character_name == t.character_name)
            {
                return Err(DomainError::invariant(format!(
                    "duplicate token for {}",
                    t.character_name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::TimeZone;

    use super::*;

    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 20, 0, 0).unwrap()
    }

    pub fn name(n: &str) -> CharacterName {
        CharacterName::new(n).unwrap()
    }

    pub fn viewer(v: &str) -> ViewerId {
        ViewerId::new(v).unwrap()
    }

    pub fn record() -> SessionRecord {
        SessionRecord::new(AdventureId::new("cantina-job").unwrap(), vec![], 120, now()).unwrap()
    }
}
