//! Turn and mode use cases.
//!
//! Everything here writes through the state store's checked path except
//! `end-combat`, which is the way out of a broken initiative.

mod initiative;
mod log_action;
mod set_mode;
mod timer;

pub use initiative::{EndCombat, NextTurn, StartInitiative};
pub use log_action::LogAction;
pub use set_mode::SetMode;
pub use timer::{AutoAdvance, AutoAdvanceReport, CheckTimer};

use std::sync::Arc;

/// Container for turn and mode use cases.
pub struct TurnUseCases {
    pub start_initiative: Arc<StartInitiative>,
    pub next_turn: Arc<NextTurn>,
    pub end_combat: Arc<EndCombat>,
    pub auto_advance: Arc<AutoAdvance>,
    pub check_timer: Arc<CheckTimer>,
    pub set_mode: Arc<SetMode>,
    pub log_action: Arc<LogAction>,
}

impl TurnUseCases {
    pub fn new(
        start_initiative: Arc<StartInitiative>,
        next_turn: Arc<NextTurn>,
        end_combat: Arc<EndCombat>,
        auto_advance: Arc<AutoAdvance>,
        check_timer: Arc<CheckTimer>,
        set_mode: Arc<SetMode>,
        log_action: Arc<LogAction>,
    ) -> Self {
        Self {
            start_initiative,
            next_turn,
            end_combat,
            auto_advance,
            check_timer,
            set_mode,
            log_action,
        }
    }
}
