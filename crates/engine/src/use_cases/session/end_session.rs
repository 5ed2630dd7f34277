//! End the session and archive it.

use std::sync::Arc;

use gamenight_domain::SessionRecord;

use crate::error::EngineError;
use crate::infrastructure::ports::ClockPort;
use crate::infrastructure::StateStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionArchived {
    pub record: SessionRecord,
    pub archived_to: String,
}

/// Mark the session ended and keep a copy under the archive directory.
///
/// A canon ending also carries each character's counters into its player
/// file. If any write fails the session stays open and the command can be
/// retried.
pub struct EndSession {
    store: Arc<StateStore>,
    clock: Arc<dyn ClockPort>,
}

impl EndSession {
    pub fn new(store: Arc<StateStore>, clock: Arc<dyn ClockPort>) -> Self {
        Self { store, clock }
    }

    pub async fn execute(&self, canon: bool) -> Result<SessionArchived, EngineError> {
        let (record, archived_to) = self.store.end_session(canon, self.clock.now()).await?;

        tracing::info!(
            session_id = %record.session().id,
            canon,
            archived_to = %archived_to,
            "Session ended"
        );
        Ok(SessionArchived {
            record,
            archived_to,
        })
    }
}
