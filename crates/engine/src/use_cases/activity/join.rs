//! Viewers taking and giving up control of characters.

use std::sync::Arc;

use gamenight_domain::{CharacterName, Controller, ParticipantJoined, ParticipantLeft, ViewerId};

use crate::error::EngineError;
use crate::infrastructure::ports::ClockPort;
use crate::infrastructure::StateStore;

/// Give a viewer control of a character.
///
/// Joining always wins: whoever held the character before (the bot, an AFK
/// viewer, or another viewer) is replaced and the missed-turn count resets.
/// A character new to the session starts from its saved canon progress.
pub struct JoinSession {
    store: Arc<StateStore>,
    clock: Arc<dyn ClockPort>,
}

impl JoinSession {
    pub fn new(store: Arc<StateStore>, clock: Arc<dyn ClockPort>) -> Self {
        Self { store, clock }
    }

    pub async fn execute(
        &self,
        viewer: ViewerId,
        character: CharacterName,
    ) -> Result<ParticipantJoined, EngineError> {
        let now = self.clock.now();
        let known = self
            .store
            .read()
            .await
            .is_some_and(|record| record.participant(&character).is_some());
        let progress = if known {
            None
        } else {
            self.store.load_progress(&character).await?
        };
        let joined = self
            .store
            .mutate_checked(|record| {
                Ok(record.join_restoring(viewer, character, progress.as_ref(), now)?)
            })
            .await?;

        if let Some(Controller::Viewer(previous)) = &joined.previous_controller {
            if previous != &joined.viewer {
                tracing::info!(
                    character = %joined.character,
                    previous = %previous,
                    viewer = %joined.viewer,
                    "Character taken over from another viewer"
                );
            }
        }
        if let Some(released) = &joined.released {
            tracing::info!(character = %released, viewer = %joined.viewer, "Previous character released to bot");
        }
        tracing::info!(character = %joined.character, viewer = %joined.viewer, "Viewer joined");
        Ok(joined)
    }
}

/// Hand the viewer's character back to the bot.
pub struct LeaveSession {
    store: Arc<StateStore>,
    clock: Arc<dyn ClockPort>,
}

impl LeaveSession {
    pub fn new(store: Arc<StateStore>, clock: Arc<dyn ClockPort>) -> Self {
        Self { store, clock }
    }

    pub async fn execute(&self, viewer: ViewerId) -> Result<ParticipantLeft, EngineError> {
        let now = self.clock.now();
        let left = self
            .store
            .mutate_checked(|record| Ok(record.leave(&viewer, now)?))
            .await?;
        tracing::info!(character = %left.character, viewer = %left.viewer, "Viewer left");
        Ok(left)
    }
}
