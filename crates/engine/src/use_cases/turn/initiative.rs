//! Combat lifecycle: roll initiative, advance by hand, end combat.

use std::sync::Arc;

use gamenight_domain::{CharacterName, CombatEnded, CombatStarted, TerrainCatalog, TurnAdvanced};

use crate::error::EngineError;
use crate::infrastructure::ports::ClockPort;
use crate::infrastructure::StateStore;

/// Enter combat with a caller-supplied turn order.
///
/// The order is used exactly as given; whoever rolled initiative has already
/// sorted it.
pub struct StartInitiative {
    store: Arc<StateStore>,
    clock: Arc<dyn ClockPort>,
    terrain: Arc<dyn TerrainCatalog>,
}

impl StartInitiative {
    pub fn new(
        store: Arc<StateStore>,
        clock: Arc<dyn ClockPort>,
        terrain: Arc<dyn TerrainCatalog>,
    ) -> Self {
        Self {
            store,
            clock,
            terrain,
        }
    }

    pub async fn execute(
        &self,
        order: Vec<CharacterName>,
        timeout_secs: Option<u64>,
    ) -> Result<CombatStarted, EngineError> {
        let now = self.clock.now();
        let started = self
            .store
            .mutate_checked(|record| {
                Ok(record.start_initiative(order, timeout_secs, self.terrain.as_ref(), now)?)
            })
            .await?;
        tracing::info!(
            combatants = started.order.len(),
            current = %started.current,
            deadline = %started.deadline,
            "Combat started"
        );
        Ok(started)
    }
}

/// Narrator-driven advance. Never counts as a missed turn.
pub struct NextTurn {
    store: Arc<StateStore>,
    clock: Arc<dyn ClockPort>,
    terrain: Arc<dyn TerrainCatalog>,
}

impl NextTurn {
    pub fn new(
        store: Arc<StateStore>,
        clock: Arc<dyn ClockPort>,
        terrain: Arc<dyn TerrainCatalog>,
    ) -> Self {
        Self {
            store,
            clock,
            terrain,
        }
    }

    pub async fn execute(&self) -> Result<TurnAdvanced, EngineError> {
        let now = self.clock.now();
        let advanced = self
            .store
            .mutate_checked(|record| Ok(record.next_turn(self.terrain.as_ref(), now)?))
            .await?;
        tracing::info!(
            previous = %advanced.previous,
            current = %advanced.current,
            round = advanced.round,
            "Turn advanced"
        );
        Ok(advanced)
    }
}

pub struct EndCombat {
    store: Arc<StateStore>,
    clock: Arc<dyn ClockPort>,
}

impl EndCombat {
    pub fn new(store: Arc<StateStore>, clock: Arc<dyn ClockPort>) -> Self {
        Self { store, clock }
    }

    /// Idempotent; also the way to clear a broken initiative.
    pub async fn execute(&self) -> Result<CombatEnded, EngineError> {
        let now = self.clock.now();
        let ended = self.store.mutate(|record| Ok(record.end_combat(now)?)).await?;
        if ended.cleared {
            tracing::info!(mode = %ended.mode, "Combat ended");
        }
        Ok(ended)
    }
}
