//! Turn & mode state machine over the session record.
//!
//! The engine never sleeps: deadline checks are pure comparisons against the
//! `now` the caller passes in.

use chrono::{DateTime, Utc};

use super::initiative::TurnOrder;
use super::session_record::SessionRecord;
use crate::entities::{
    ActionKind, ActionLogEntry, ActiveMap, TerrainCatalog, DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH,
    MAX_ACTION_TEXT,
};
use crate::error::DomainError;
use crate::events::{AutoAdvanceOutcome, CombatEnded, CombatStarted, ModeChanged, TurnAdvanced};
use crate::ids::ActionId;
use crate::value_objects::{
    bounded_text, ActionPolicy, CharacterName, GameMode, MapId, ModeTransition, ViewerId,
};

/// Who submitted an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    /// The narrator's own channel
    Narrator,
    Viewer(ViewerId),
}

impl Actor {
    pub fn is_narrator(&self) -> bool {
        matches!(self, Actor::Narrator)
    }
}

/// Read-only view of the turn timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerStatus {
    pub mode: GameMode,
    pub current: Option<CharacterName>,
    pub deadline: Option<DateTime<Utc>>,
    pub remaining_secs: Option<i64>,
    pub expired: bool,
    pub round: u32,
}

/// Narration written when a combatant's timer runs out.
pub fn hesitation_narration(character: &CharacterName) -> String {
    format!("{character} hesitates, losing their moment...")
}

impl SessionRecord {
    /// Start combat with the sequence in exactly the order given.
    pub fn start_initiative(
        &mut self,
        order: Vec<CharacterName>,
        timeout_secs: Option<u64>,
        terrain: &dyn TerrainCatalog,
        now: DateTime<Utc>,
    ) -> Result<CombatStarted, DomainError> {
        self.ensure_active()?;
        let timeout = timeout_secs.unwrap_or(self.turn.timeout_secs());
        let turn = TurnOrder::start(order, timeout, now)?;
        let current = turn
            .current()
            .cloned()
            .ok_or_else(|| DomainError::invariant("new initiative has no current entry"))?;

        self.turn = turn;
        self.session.mode = GameMode::Combat;
        let map_switched_to = self.follow_combatant(&current, terrain);
        self.frame_combat();
        self.touch(now);

        Ok(CombatStarted {
            order: self.turn.order().to_vec(),
            current,
            round: self.turn.round(),
            deadline: self.turn.deadline().unwrap_or(now),
            map_switched_to,
        })
    }

    /// GM-driven advance. Never counts as a skip; clears the streak of a
    /// combatant who acted this turn.
    pub fn next_turn(
        &mut self,
        terrain: &dyn TerrainCatalog,
        now: DateTime<Utc>,
    ) -> Result<TurnAdvanced, DomainError> {
        self.ensure_active()?;
        if self.session.mode != GameMode::Combat {
            return Err(DomainError::invalid_state_transition(
                "next-turn needs combat; use 'initiative' first",
            ));
        }
        let previous = self.current_combatant()?;
        if self.turn.acted_this_turn() {
            if let Some(p) = self.participant_mut(&previous) {
                p.clear_skips();
            }
        }
        self.advance_turn(previous, terrain, now)
    }

    /// Timer-driven advance. A no-op before the deadline, so repeated calls
    /// cannot double-advance.
    pub fn auto_advance(
        &mut self,
        terrain: &dyn TerrainCatalog,
        now: DateTime<Utc>,
    ) -> Result<AutoAdvanceOutcome, DomainError> {
        if !self.session.is_active() || self.session.mode != GameMode::Combat {
            return Ok(AutoAdvanceOutcome::NotInCombat);
        }
        let previous = self.current_combatant()?;
        let remaining_secs = self
            .turn
            .remaining_secs(now)
            .ok_or_else(|| DomainError::invariant("combat turn without a deadline"))?;
        if !self.turn.is_expired(now) {
            return Ok(AutoAdvanceOutcome::NotExpired {
                current: previous,
                remaining_secs,
            });
        }

        let acted = self.turn.acted_this_turn();
        let skipped = match self.participant_mut(&previous) {
            Some(p) if acted => {
                p.clear_skips();
                None
            }
            Some(p) => Some(p.record_skip()),
            None => None,
        };
        if !acted {
            self.session.narration = hesitation_narration(&previous);
        }
        let advance = self.advance_turn(previous, terrain, now)?;
        Ok(AutoAdvanceOutcome::Advanced { advance, skipped })
    }

    /// Clear the initiative. Combat returns to rp; a cutscene stays a cutscene.
    /// Always allowed, so it can clear an invariant violation.
    pub fn end_combat(&mut self, now: DateTime<Utc>) -> Result<CombatEnded, DomainError> {
        self.ensure_active()?;
        let cleared = !self.turn.is_empty() || self.turn.current_index().is_some();
        self.turn.clear();
        if self.session.mode == GameMode::Combat {
            self.session.mode = GameMode::Rp;
        }
        if cleared {
            self.frame_after_combat();
            self.touch(now);
        }
        Ok(CombatEnded {
            cleared,
            mode: self.session.mode,
        })
    }

    pub fn set_mode(&mut self, to: GameMode, now: DateTime<Utc>) -> Result<ModeChanged, DomainError> {
        self.ensure_active()?;
        let from = self.session.mode;
        let transition = from.transition(to, !self.turn.is_empty())?;
        match transition {
            ModeTransition::Unchanged => {}
            ModeTransition::Switch | ModeTransition::SuspendCombat => {
                self.session.mode = to;
            }
            ModeTransition::ResumeCombat => {
                self.session.mode = to;
                self.turn.refresh_deadline(now);
            }
            ModeTransition::AbandonCombat => {
                self.session.mode = to;
                self.turn.clear();
            }
        }
        if transition != ModeTransition::Unchanged {
            self.touch(now);
        }
        Ok(ModeChanged {
            from,
            to,
            transition,
        })
    }

    pub fn timer_status(&self, now: DateTime<Utc>) -> TimerStatus {
        let in_combat = self.session.mode == GameMode::Combat;
        TimerStatus {
            mode: self.session.mode,
            current: self.turn.current().cloned(),
            deadline: self.turn.deadline().filter(|_| in_combat),
            remaining_secs: self
                .turn
                .remaining_secs(now)
                .filter(|_| in_combat)
                .map(|secs| secs.max(0)),
            expired: in_combat && self.turn.is_expired(now),
            round: self.turn.round(),
        }
    }

    /// Validate and append an action according to the current mode.
    pub fn log_action(
        &mut self,
        actor: &Actor,
        character: &CharacterName,
        kind: ActionKind,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<ActionLogEntry, DomainError> {
        self.ensure_active()?;
        let summary = bounded_text("Action text", text, MAX_ACTION_TEXT)?;
        if summary.is_empty() {
            return Err(DomainError::validation("Action text cannot be empty"));
        }

        match self.session.mode.action_policy() {
            ActionPolicy::NarratorOnly => {
                if !actor.is_narrator() {
                    return Err(DomainError::NarratorOnly);
                }
            }
            ActionPolicy::TurnEnforced => {
                let current = self.current_combatant()?;
                if character != &current || !self.may_act_as(actor, character) {
                    return Err(DomainError::not_your_turn(current.as_str()));
                }
            }
            ActionPolicy::FreeForm => {
                if let Actor::Viewer(viewer) = actor {
                    let participant = self
                        .participant(character)
                        .ok_or_else(|| DomainError::not_found("Character", character.as_str()))?;
                    if !participant.is_controlled_by(viewer) {
                        return Err(DomainError::validation(format!(
                            "{viewer} does not control {character}"
                        )));
                    }
                } else if !self.may_act_as(actor, character) {
                    return Err(DomainError::validation(format!(
                        "{character} is controlled by a viewer"
                    )));
                }
            }
        }

        let entry = ActionLogEntry {
            id: ActionId::new(),
            character_name: character.clone(),
            viewer: match actor {
                Actor::Viewer(v) => Some(v.clone()),
                Actor::Narrator => None,
            },
            kind,
            summary,
            timestamp: now,
        };
        self.action_log.push(entry.clone());
        if let Some(p) = self.participant_mut(character) {
            p.record_action(now);
        }
        if self.session.mode == GameMode::Combat {
            self.turn.mark_acted();
        }
        self.touch(now);
        Ok(entry)
    }

    /// Viewers act only for characters they control; the narrator acts for
    /// bot-held characters and anyone without a participant row.
    fn may_act_as(&self, actor: &Actor, character: &CharacterName) -> bool {
        let participant = self.participant(character);
        match actor {
            Actor::Viewer(viewer) => participant.is_some_and(|p| p.is_controlled_by(viewer)),
            Actor::Narrator => participant.is_none_or(|p| p.controller().is_bot()),
        }
    }

    fn current_combatant(&self) -> Result<CharacterName, DomainError> {
        self.turn
            .current()
            .cloned()
            .ok_or_else(|| DomainError::invariant("combat without a current turn"))
    }

    fn advance_turn(
        &mut self,
        previous: CharacterName,
        terrain: &dyn TerrainCatalog,
        now: DateTime<Utc>,
    ) -> Result<TurnAdvanced, DomainError> {
        let current = self.turn.advance(now)?;
        let map_switched_to = self.follow_combatant(&current, terrain);
        self.touch(now);
        Ok(TurnAdvanced {
            previous,
            current,
            round: self.turn.round(),
            deadline: self.turn.deadline().unwrap_or(now),
            map_switched_to,
        })
    }

    /// Point the active map at the combatant's token when it sits elsewhere.
    fn follow_combatant(
        &mut self,
        character: &CharacterName,
        terrain: &dyn TerrainCatalog,
    ) -> Option<MapId> {
        let token_map = self.token(character)?.map.clone();
        if self
            .session
            .active_map_id()
            .is_some_and(|active| active.same_map(&token_map))
        {
            return None;
        }
        self.session.active_map = Some(active_map_for(&token_map, None, terrain));
        Some(token_map)
    }
}

/// Build the active-map descriptor, taking size from terrain when present.
pub(crate) fn active_map_for(
    map: &MapId,
    name: Option<String>,
    terrain: &dyn TerrainCatalog,
) -> ActiveMap {
    let data = terrain.terrain(map);
    let (width, height) = data
        .as_ref()
        .map(|t| (t.width, t.height))
        .unwrap_or((DEFAULT_MAP_WIDTH, DEFAULT_MAP_HEIGHT));
    ActiveMap {
        id: map.clone(),
        name: name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| map.display_name()),
        width,
        height,
    }
}
