//! Application state and composition.

use std::sync::Arc;

use gamenight_domain::{Actor, TerrainCatalog, ViewerId};

use crate::config::EngineConfig;
use crate::infrastructure::{ports::ClockPort, StateStore};
use crate::use_cases::{
    self, activity, movement, narrative, session, status, turn, ActivityUseCases,
    MovementUseCases, NarrativeUseCases, SessionUseCases, StatusUseCases, TurnUseCases,
};

/// Main application state.
///
/// Holds the state store and every use case. Passed to HTTP handlers and the
/// timer loop via `Arc<App>`.
pub struct App {
    pub store: Arc<StateStore>,
    pub use_cases: UseCases,
    narrator_id: String,
}

/// Container for all use cases.
pub struct UseCases {
    pub session: SessionUseCases,
    pub turn: TurnUseCases,
    pub movement: MovementUseCases,
    pub activity: ActivityUseCases,
    pub narrative: NarrativeUseCases,
    pub status: StatusUseCases,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        config: &EngineConfig,
        store: Arc<StateStore>,
        clock: Arc<dyn ClockPort>,
        terrain: Arc<dyn TerrainCatalog>,
    ) -> Self {
        let session = use_cases::SessionUseCases::new(
            Arc::new(session::InitSession::new(
                store.clone(),
                clock.clone(),
                config.adventures_dir.clone(),
                config.turn_timeout_secs,
            )),
            Arc::new(session::EndSession::new(store.clone(), clock.clone())),
        );

        let turn = use_cases::TurnUseCases::new(
            Arc::new(turn::StartInitiative::new(
                store.clone(),
                clock.clone(),
                terrain.clone(),
            )),
            Arc::new(turn::NextTurn::new(
                store.clone(),
                clock.clone(),
                terrain.clone(),
            )),
            Arc::new(turn::EndCombat::new(store.clone(), clock.clone())),
            Arc::new(turn::AutoAdvance::new(
                store.clone(),
                clock.clone(),
                terrain.clone(),
            )),
            Arc::new(turn::CheckTimer::new(store.clone(), clock.clone())),
            Arc::new(turn::SetMode::new(store.clone(), clock.clone())),
            Arc::new(turn::LogAction::new(store.clone(), clock.clone())),
        );

        let movement = use_cases::MovementUseCases::new(
            Arc::new(movement::MoveToken::new(
                store.clone(),
                clock.clone(),
                terrain.clone(),
            )),
            Arc::new(movement::RemoveToken::new(store.clone(), clock.clone())),
            Arc::new(movement::TransferToken::new(
                store.clone(),
                clock.clone(),
                terrain.clone(),
            )),
            Arc::new(movement::SetMap::new(
                store.clone(),
                clock.clone(),
                terrain.clone(),
            )),
            Arc::new(movement::SwitchScene::new(
                store.clone(),
                clock.clone(),
                terrain.clone(),
            )),
            Arc::new(movement::ListPositions::new(store.clone(), terrain.clone())),
            Arc::new(movement::SetCamera::new(
                store.clone(),
                clock.clone(),
                terrain.clone(),
            )),
        );

        let activity = use_cases::ActivityUseCases::new(
            Arc::new(activity::JoinSession::new(store.clone(), clock.clone())),
            Arc::new(activity::LeaveSession::new(store.clone(), clock.clone())),
            Arc::new(activity::CheckIdle::new(store.clone())),
            Arc::new(activity::ActivitySummary::new(store.clone())),
        );

        let narrative = use_cases::NarrativeUseCases::new(
            Arc::new(narrative::AdjustPoints::new(store.clone(), clock.clone())),
            Arc::new(narrative::RecordWound::new(store.clone(), clock.clone())),
            Arc::new(narrative::LogDice::new(store.clone(), clock.clone())),
            Arc::new(narrative::UpdateScene::new(store.clone(), clock.clone())),
            Arc::new(narrative::SetCrawl::new(store.clone(), clock.clone())),
        );

        let status = use_cases::StatusUseCases::new(
            Arc::new(status::GetStatus::new(store.clone(), clock.clone())),
            Arc::new(status::GetContext::new(store.clone())),
        );

        Self {
            store,
            use_cases: UseCases {
                session,
                turn,
                movement,
                activity,
                narrative,
                status,
            },
            narrator_id: config.narrator_id.clone(),
        }
    }

    /// Who is acting: the configured narrator id maps to the narrator, anyone
    /// else is a viewer.
    pub fn actor(&self, viewer: ViewerId) -> Actor {
        if viewer.as_str() == self.narrator_id {
            Actor::Narrator
        } else {
            Actor::Viewer(viewer)
        }
    }
}
