//! Participant control and activity reporting.

mod join;
mod reports;

pub use join::{JoinSession, LeaveSession};
pub use reports::{ActivitySummary, CheckIdle};

use std::sync::Arc;

/// Container for activity use cases.
pub struct ActivityUseCases {
    pub join: Arc<JoinSession>,
    pub leave: Arc<LeaveSession>,
    pub check_idle: Arc<CheckIdle>,
    pub activity_summary: Arc<ActivitySummary>,
}

impl ActivityUseCases {
    pub fn new(
        join: Arc<JoinSession>,
        leave: Arc<LeaveSession>,
        check_idle: Arc<CheckIdle>,
        activity_summary: Arc<ActivitySummary>,
    ) -> Self {
        Self {
            join,
            leave,
            check_idle,
            activity_summary,
        }
    }
}
