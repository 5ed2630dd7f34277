//! Scene text, opening crawl, character counters and session end.

use chrono::{DateTime, Utc};

use super::session_record::SessionRecord;
use crate::entities::{
    push_dice, DiceLogEntry, NpcRecord, OpeningCrawl, SessionStatus, MAX_NARRATION,
};
use crate::error::DomainError;
use crate::value_objects::{bounded_text, CharacterName, WoundLevel};

const MAX_AWARD: u32 = 100;

/// Partial scene update; `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneUpdate {
    pub act: Option<String>,
    pub scene: Option<String>,
    pub narration: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WoundRecorded {
    pub character: CharacterName,
    pub level: WoundLevel,
    /// True when the character is on the NPC roster rather than a participant
    pub npc: bool,
}

impl SessionRecord {
    pub fn update_scene(
        &mut self,
        update: SceneUpdate,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        self.ensure_active()?;
        if update == SceneUpdate::default() {
            return Err(DomainError::validation(
                "Provide at least one of act, scene or narration",
            ));
        }
        let act = update
            .act
            .map(|a| bounded_text("Act", a, MAX_NARRATION))
            .transpose()?;
        let scene = update
            .scene
            .map(|s| bounded_text("Scene", s, MAX_NARRATION))
            .transpose()?;
        let narration = update
            .narration
            .map(|n| bounded_text("Narration", n, MAX_NARRATION))
            .transpose()?;

        if let Some(act) = act {
            self.session.act = act;
        }
        if let Some(scene) = scene {
            self.session.scene = scene;
        }
        if let Some(narration) = narration {
            self.session.narration = narration;
        }
        self.touch(now);
        Ok(())
    }

    /// The opening crawl can be written once per session.
    pub fn set_crawl(&mut self, crawl: OpeningCrawl, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.ensure_active()?;
        if self.session.crawl.is_some() {
            return Err(DomainError::validation(
                "The opening crawl has already been set for this session",
            ));
        }
        self.session.crawl = Some(crawl);
        self.touch(now);
        Ok(())
    }

    pub fn award_character_points(
        &mut self,
        character: &CharacterName,
        points: u32,
        now: DateTime<Utc>,
    ) -> Result<u32, DomainError> {
        self.ensure_active()?;
        if points == 0 || points > MAX_AWARD {
            return Err(DomainError::validation(format!(
                "Award must be between 1 and {MAX_AWARD} points"
            )));
        }
        let total = self
            .require_participant_mut(character)?
            .award_character_points(points);
        self.touch(now);
        Ok(total)
    }

    pub fn spend_character_points(
        &mut self,
        character: &CharacterName,
        points: u32,
        now: DateTime<Utc>,
    ) -> Result<u32, DomainError> {
        self.ensure_active()?;
        if points == 0 {
            return Err(DomainError::validation("Spend at least 1 CP"));
        }
        let left = self
            .require_participant_mut(character)?
            .spend_character_points(points)?;
        self.touch(now);
        Ok(left)
    }

    pub fn spend_force_points(
        &mut self,
        character: &CharacterName,
        now: DateTime<Utc>,
    ) -> Result<u32, DomainError> {
        self.ensure_active()?;
        let left = self.require_participant_mut(character)?.spend_force_points(1)?;
        self.touch(now);
        Ok(left)
    }

    /// Record a wound level. Names without a participant row go on the NPC
    /// roster.
    pub fn record_wound(
        &mut self,
        character: CharacterName,
        level: WoundLevel,
        now: DateTime<Utc>,
    ) -> Result<WoundRecorded, DomainError> {
        self.ensure_active()?;
        let npc = match self.participant_mut(&character) {
            Some(p) => {
                p.set_wound_level(level);
                false
            }
            None => {
                match self.npcs.iter_mut().find(|n| n.name == character) {
                    Some(npc) => npc.wound_level = level,
                    None => self.npcs.push(NpcRecord {
                        name: character.clone(),
                        wound_level: level,
                    }),
                }
                true
            }
        };
        self.touch(now);
        Ok(WoundRecorded {
            character,
            level,
            npc,
        })
    }

    pub fn log_dice(&mut self, entry: DiceLogEntry, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.ensure_active()?;
        push_dice(&mut self.dice_log, entry);
        self.touch(now);
        Ok(())
    }

    /// Close the session. The record is kept; every later mutation fails with
    /// `NoActiveSession` until the next `init`.
    pub fn end(&mut self, canon: bool, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.ensure_active()?;
        self.session.status = SessionStatus::Ended;
        self.session.ended_at = Some(now);
        self.session.canon = canon;
        self.touch(now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::session_record::test_support::*;
    use super::*;

    #[test]
    fn crawl_is_write_once() {
        let mut r = record();
        let crawl = OpeningCrawl::new("STAR WARS", "Episode I", vec!["It is a period...".into()])
            .unwrap();
        r.set_crawl(crawl.clone(), now()).unwrap();
        assert!(matches!(
            r.set_crawl(crawl, now()),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn update_scene_changes_only_given_fields() {
        let mut r = record();
        r.update_scene(
            SceneUpdate {
                scene: Some("Docking Bay 94".into()),
                ..Default::default()
            },
            now(),
        )
        .unwrap();
        assert_eq!(r.session().act, "1");
        assert_eq!(r.session().scene, "Docking Bay 94");
        assert!(r.update_scene(SceneUpdate::default(), now()).is_err());
        let long = SceneUpdate {
            narration: Some("x".repeat(MAX_NARRATION + 1)),
            ..Default::default()
        };
        assert!(r.update_scene(long, now()).is_err());
    }

    #[test]
    fn character_points_round_trip() {
        let mut r = record();
        r.join(viewer("renn"), name("Kira"), now()).unwrap();
        assert_eq!(r.award_character_points(&name("Kira"), 2, now()).unwrap(), 7);
        assert_eq!(r.spend_character_points(&name("Kira"), 3, now()).unwrap(), 4);
        assert_eq!(r.spend_force_points(&name("Kira"), now()).unwrap(), 0);
        assert!(r.spend_force_points(&name("Kira"), now()).is_err());
        assert!(r.award_character_points(&name("Kira"), 0, now()).is_err());
        assert!(matches!(
            r.award_character_points(&name("Ghost"), 1, now()),
            Err(DomainError::NotFound { .. })
        ));
    }

    #[test]
    fn wounds_on_unknown_names_go_to_npc_roster() {
        let mut r = record();
        r.join(viewer("renn"), name("Kira"), now()).unwrap();
        let kira = r.record_wound(name("Kira"), WoundLevel::Stunned, now()).unwrap();
        assert!(!kira.npc);
        let trooper = r
            .record_wound(name("Stormtrooper"), WoundLevel::Wounded, now())
            .unwrap();
        assert!(trooper.npc);
        r.record_wound(name("Stormtrooper"), WoundLevel::Dead, now()).unwrap();
        assert_eq!(r.npcs().len(), 1);
        assert!(!r.npcs()[0].is_active());
    }

    #[test]
    fn ended_session_rejects_mutations() {
        let mut r = record();
        r.end(true, now()).unwrap();
        assert!(r.session().canon);
        assert_eq!(r.session().ended_at, Some(now()));
        assert_eq!(r.end(false, now()), Err(DomainError::NoActiveSession));
        assert_eq!(
            r.join(viewer("renn"), name("Kira"), now()).unwrap_err(),
            DomainError::NoActiveSession
        );
    }
}
