//! Session lifecycle use cases.

mod end_session;
mod init_session;

pub use end_session::{EndSession, SessionArchived};
pub use init_session::InitSession;

use std::sync::Arc;

/// Container for session lifecycle use cases.
pub struct SessionUseCases {
    pub init: Arc<InitSession>,
    pub end: Arc<EndSession>,
}

impl SessionUseCases {
    pub fn new(init: Arc<InitSession>, end: Arc<EndSession>) -> Self {
        Self { init, end }
    }
}
