//! Explicit mode switch.

use std::sync::Arc;

use gamenight_domain::{GameMode, ModeChanged};

use crate::error::EngineError;
use crate::infrastructure::ports::ClockPort;
use crate::infrastructure::StateStore;

/// Move between rp, combat and cutscene along the transition table.
///
/// A cutscene entered mid-fight keeps the initiative so `combat` can resume
/// on the same turn with a fresh deadline.
pub struct SetMode {
    store: Arc<StateStore>,
    clock: Arc<dyn ClockPort>,
}

impl SetMode {
    pub fn new(store: Arc<StateStore>, clock: Arc<dyn ClockPort>) -> Self {
        Self { store, clock }
    }

    pub async fn execute(&self, mode: GameMode) -> Result<ModeChanged, EngineError> {
        let now = self.clock.now();
        let changed = self
            .store
            .mutate_checked(|record| Ok(record.set_mode(mode, now)?))
            .await?;
        tracing::info!(
            from = %changed.from,
            to = %changed.to,
            transition = ?changed.transition,
            "Mode set"
        );
        Ok(changed)
    }
}
