//! Join/leave and activity reads.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::session_record::SessionRecord;
use crate::entities::{ActivityStatus, CharacterProgress, Controller, Participant, IDLE_SKIPS};
use crate::error::DomainError;
use crate::events::{ParticipantJoined, ParticipantLeft};
use crate::value_objects::{CharacterName, ViewerId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdleEntry {
    pub character: CharacterName,
    pub controller: Controller,
    pub status: ActivityStatus,
    pub skip_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    pub character: CharacterName,
    pub actions: usize,
    pub last_action_at: Option<DateTime<Utc>>,
}

impl SessionRecord {
    /// Take control of a character. Joining always wins: whatever the skip
    /// count or current controller, the viewer ends up in control with a
    /// clean streak. A character the viewer held before goes to the bot.
    pub fn join(
        &mut self,
        viewer: ViewerId,
        character: CharacterName,
        now: DateTime<Utc>,
    ) -> Result<ParticipantJoined, DomainError> {
        self.join_restoring(viewer, character, None, now)
    }

    /// `join`, seeding a newly created participant with the counters a
    /// previous canon session saved. An existing row keeps its own.
    pub fn join_restoring(
        &mut self,
        viewer: ViewerId,
        character: CharacterName,
        progress: Option<&CharacterProgress>,
        now: DateTime<Utc>,
    ) -> Result<ParticipantJoined, DomainError> {
        self.ensure_active()?;

        let released = match self.character_of(&viewer) {
            Some(p) if p.character_name() != &character => Some(p.character_name().clone()),
            _ => None,
        };
        if let Some(old) = &released {
            self.require_participant_mut(old)?.release_to_bot();
        }

        let previous_controller = match self.participant_mut(&character) {
            Some(p) => Some(p.reclaim(viewer.clone(), now)),
            None => {
                let mut joined = Participant::joined(character.clone(), viewer.clone(), now);
                if let Some(progress) = progress.filter(|p| p.name == character) {
                    joined.restore(progress);
                }
                self.participants.push(joined);
                None
            }
        };
        self.touch(now);

        Ok(ParticipantJoined {
            character,
            viewer,
            previous_controller,
            released,
        })
    }

    /// Hand the viewer's character to the bot. The participant row stays.
    pub fn leave(
        &mut self,
        viewer: &ViewerId,
        now: DateTime<Utc>,
    ) -> Result<ParticipantLeft, DomainError> {
        self.ensure_active()?;
        let character = self
            .character_of(viewer)
            .map(|p| p.character_name().clone())
            .ok_or_else(|| DomainError::not_found("Player", viewer.as_str()))?;
        self.require_participant_mut(&character)?.release_to_bot();
        self.touch(now);
        Ok(ParticipantLeft {
            character,
            viewer: viewer.clone(),
        })
    }

    /// Participants that have missed at least two turns in a row.
    pub fn idle_report(&self) -> Vec<IdleEntry> {
        self.participants
            .iter()
            .filter(|p| p.skip_count() >= IDLE_SKIPS || p.activity_status() != ActivityStatus::Active)
            .map(|p| IdleEntry {
                character: p.character_name().clone(),
                controller: p.controller().clone(),
                status: p.activity_status(),
                skip_count: p.skip_count(),
            })
            .collect()
    }

    /// Per-character action counts and latest timestamp, derived from the
    /// log. Participants who never acted appear with a zero count.
    pub fn activity_summary(&self) -> Vec<ActivityEntry> {
        let mut summary: BTreeMap<&CharacterName, (usize, Option<DateTime<Utc>>)> = self
            .participants
            .iter()
            .map(|p| (p.character_name(), (0, None)))
            .collect();
        for entry in &self.action_log {
            let slot = summary.entry(&entry.character_name).or_insert((0, None));
            slot.0 += 1;
            slot.1 = slot.1.max(Some(entry.timestamp));
        }
        summary
            .into_iter()
            .map(|(character, (actions, last_action_at))| ActivityEntry {
                character: character.clone(),
                actions,
                last_action_at,
            })
            .collect()
    }
}
