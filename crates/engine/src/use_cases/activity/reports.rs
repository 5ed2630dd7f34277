//! Read-only activity reports.

use std::sync::Arc;

use gamenight_domain::{ActivityEntry, DomainError, IdleEntry};

use crate::error::EngineError;
use crate::infrastructure::StateStore;

/// Participants with missed turns or a non-active status.
pub struct CheckIdle {
    store: Arc<StateStore>,
}

impl CheckIdle {
    pub fn new(store: Arc<StateStore>) -> Self {
        Self { store }
    }

    pub async fn execute(&self) -> Result<Vec<IdleEntry>, EngineError> {
        let record = self.store.read().await.ok_or(DomainError::NoActiveSession)?;
        Ok(record.idle_report())
    }
}

/// Per-character action counts and the time of the latest action.
pub struct ActivitySummary {
    store: Arc<StateStore>,
}

impl ActivitySummary {
    pub fn new(store: Arc<StateStore>) -> Self {
        Self { store }
    }

    pub async fn execute(&self) -> Result<Vec<ActivityEntry>, EngineError> {
        let record = self.store.read().await.ok_or(DomainError::NoActiveSession)?;
        Ok(record.activity_summary())
    }
}
