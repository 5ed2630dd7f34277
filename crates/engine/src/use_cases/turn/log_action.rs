//! Record a character's action, subject to the current mode's policy.

use std::sync::Arc;

use gamenight_domain::{ActionKind, ActionLogEntry, Actor, CharacterName};

use crate::error::EngineError;
use crate::infrastructure::ports::ClockPort;
use crate::infrastructure::StateStore;

/// Append to the action log.
///
/// In a cutscene only the narrator may act; in combat only the current
/// combatant's controller; in rp any controller of an existing character.
/// An accepted action resets that character's missed-turn count.
pub struct LogAction {
    store: Arc<StateStore>,
    clock: Arc<dyn ClockPort>,
}

impl LogAction {
    pub fn new(store: Arc<StateStore>, clock: Arc<dyn ClockPort>) -> Self {
        Self { store, clock }
    }

    pub async fn execute(
        &self,
        actor: Actor,
        character: CharacterName,
        kind: ActionKind,
        text: String,
    ) -> Result<ActionLogEntry, EngineError> {
        let now = self.clock.now();
        let entry = self
            .store
            .mutate_checked(|record| Ok(record.log_action(&actor, &character, kind, &text, now)?))
            .await?;
        tracing::info!(
            character = %entry.character_name,
            narrator = actor.is_narrator(),
            "Action logged"
        );
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{name, viewer, Harness};
    use crate::use_cases::turn::{SetMode, StartInitiative};
    use gamenight_domain::{DomainError, GameMode};

    #[tokio::test]
    async fn wrong_viewer_in_combat_names_current_turn() {
        let h = Harness::with_session().await;
        StartInitiative::new(h.store.clone(), h.clock.port(), h.terrain.clone())
            .execute(vec![name("Kira"), name("Stormtrooper")], Some(120))
            .await
            .unwrap();
        let before = h.snapshot().await;

        let err = LogAction::new(h.store.clone(), h.clock.port())
            .execute(
                Actor::Viewer(viewer("renn")),
                name("Kira"),
                ActionKind::Do,
                "fires".to_string(),
            )
            .await
            .unwrap_err();

        match err {
            EngineError::Domain(DomainError::NotYourTurn { current, .. }) => {
                assert_eq!(current, "Kira")
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(h.snapshot().await, before);
    }

    #[tokio::test]
    async fn cutscene_is_narrator_only() {
        let h = Harness::with_session().await;
        SetMode::new(h.store.clone(), h.clock.port())
            .execute(GameMode::Cutscene)
            .await
            .unwrap();
        let log = LogAction::new(h.store.clone(), h.clock.port());

        let err = log
            .execute(
                Actor::Viewer(viewer("mira")),
                name("Kira"),
                ActionKind::Say,
                "Wait!".to_string(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Domain(DomainError::NarratorOnly)));

        log.execute(
            Actor::Narrator,
            name("Vader"),
            ActionKind::Say,
            "I find your lack of faith disturbing.".to_string(),
        )
        .await
        .unwrap();
        assert_eq!(h.snapshot().await.action_log().len(), 1);
    }

    #[tokio::test]
    async fn rp_action_resets_skips() {
        let h = Harness::with_session().await;

        let entry = LogAction::new(h.store.clone(), h.clock.port())
            .execute(
                Actor::Viewer(viewer("mira")),
                name("Kira"),
                ActionKind::Do,
                "checks the door".to_string(),
            )
            .await
            .unwrap();

        assert_eq!(entry.summary, "checks the door");
        let snapshot = h.snapshot().await;
        let kira = snapshot.participant(&name("Kira")).unwrap();
        assert_eq!(kira.skip_count(), 0);
        assert!(kira.last_action_at().is_some());
    }
}
