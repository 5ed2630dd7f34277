//! Narrative use cases: scene text, the opening crawl and the opaque
//! per-character counters the narrator keeps in the record.

mod character_state;
mod scene;

pub use character_state::{AdjustPoints, DiceRoll, LogDice, PointChange, RecordWound};
pub use scene::{SetCrawl, UpdateScene};

use std::sync::Arc;

/// Container for narrative use cases.
pub struct NarrativeUseCases {
    pub adjust_points: Arc<AdjustPoints>,
    pub record_wound: Arc<RecordWound>,
    pub log_dice: Arc<LogDice>,
    pub update_scene: Arc<UpdateScene>,
    pub set_crawl: Arc<SetCrawl>,
}

impl NarrativeUseCases {
    pub fn new(
        adjust_points: Arc<AdjustPoints>,
        record_wound: Arc<RecordWound>,
        log_dice: Arc<LogDice>,
        update_scene: Arc<UpdateScene>,
        set_crawl: Arc<SetCrawl>,
    ) -> Self {
        Self {
            adjust_points,
            record_wound,
            log_dice,
            update_scene,
            set_crawl,
        }
    }
}
