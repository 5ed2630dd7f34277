//! Read models for overlays and the narrator's tooling.

use std::sync::Arc;

use gamenight_domain::DomainError;
use gamenight_shared::{ContextView, StatusView};

use crate::error::EngineError;
use crate::infrastructure::ports::ClockPort;
use crate::infrastructure::StateStore;

/// Full snapshot for the overlay. Works without a session so the overlay can
/// show an idle screen, and reports whether the last write reached disk.
pub struct GetStatus {
    store: Arc<StateStore>,
    clock: Arc<dyn ClockPort>,
}

impl GetStatus {
    pub fn new(store: Arc<StateStore>, clock: Arc<dyn ClockPort>) -> Self {
        Self { store, clock }
    }

    pub async fn execute(&self) -> StatusView {
        let record = self.store.read().await;
        StatusView::new(record.as_deref(), self.clock.now(), self.store.is_healthy())
    }
}

/// Compact summary for narration prompts.
pub struct GetContext {
    store: Arc<StateStore>,
}

impl GetContext {
    pub fn new(store: Arc<StateStore>) -> Self {
        Self { store }
    }

    pub async fn execute(&self) -> Result<ContextView, EngineError> {
        let record = self.store.read().await.ok_or(DomainError::NoActiveSession)?;
        Ok(ContextView::new(&record))
    }
}

/// Container for read-model use cases.
pub struct StatusUseCases {
    pub status: Arc<GetStatus>,
    pub context: Arc<GetContext>,
}

impl StatusUseCases {
    pub fn new(status: Arc<GetStatus>, context: Arc<GetContext>) -> Self {
        Self { status, context }
    }
}
