//! Turn timer: the periodic auto-advance and the read-only timer check.

use std::sync::Arc;

use gamenight_domain::{AutoAdvanceOutcome, DomainError, TerrainCatalog, TimerStatus};

use crate::error::EngineError;
use crate::infrastructure::ports::ClockPort;
use crate::infrastructure::StateStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoAdvanceReport {
    pub outcome: AutoAdvanceOutcome,
    /// Timer state after the call.
    pub timer: TimerStatus,
}

/// Advance past an expired turn, counting it as missed if nobody acted.
///
/// Called on a fixed interval and by hand. Before the deadline this changes
/// nothing and nothing is written.
pub struct AutoAdvance {
    store: Arc<StateStore>,
    clock: Arc<dyn ClockPort>,
    terrain: Arc<dyn TerrainCatalog>,
}

impl AutoAdvance {
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

    pub async fn execute(&self) -> Result<AutoAdvanceReport, EngineError> {
        let now = self.clock.now();
        let report = self
            .store
            .mutate_checked(|record| {
                let outcome = record.auto_advance(self.terrain.as_ref(), now)?;
                Ok(AutoAdvanceReport {
                    outcome,
                    timer: record.timer_status(now),
                })
            })
            .await?;

        match &report.outcome {
            AutoAdvanceOutcome::Advanced { advance, skipped } => {
                match skipped {
                    Some(skip) if skip.became_afk => tracing::warn!(
                        character = %advance.previous,
                        skips = skip.skips,
                        "Character is AFK; bot takes control"
                    ),
                    Some(skip) => tracing::info!(
                        character = %advance.previous,
                        skips = skip.skips,
                        status = %skip.status,
                        "Turn timed out"
                    ),
                    None => {}
                }
                tracing::info!(
                    current = %advance.current,
                    round = advance.round,
                    "Turn auto-advanced"
                );
            }
            AutoAdvanceOutcome::NotExpired {
                current,
                remaining_secs,
            } => {
                tracing::debug!(current = %current, remaining_secs, "Turn not yet expired");
            }
            AutoAdvanceOutcome::NotInCombat => {}
        }
        Ok(report)
    }
}

pub struct CheckTimer {
    store: Arc<StateStore>,
    clock: Arc<dyn ClockPort>,
}

impl CheckTimer {
    pub fn new(store: Arc<StateStore>, clock: Arc<dyn ClockPort>) -> Self {
        Self { store, clock }
    }

    pub async fn execute(&self) -> Result<TimerStatus, EngineError> {
        let record = self.store.read().await.ok_or(DomainError::NoActiveSession)?;
        Ok(record.timer_status(self.clock.now()))
    }
}
