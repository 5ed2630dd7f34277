//! Domain entities - the children the session record owns

mod action_log;
mod camera;
mod npc;
mod participant;
mod progress;
mod session;
mod terrain;
mod token;

pub use action_log::{
    push_dice, ActionKind, ActionLogEntry, DiceLogEntry, DICE_LOG_CAPACITY, MAX_ACTION_TEXT,
};
pub use camera::{
    Camera, CameraTarget, Zoom, MAX_ZOOM, MIN_ZOOM, OVERVIEW_HEIGHT, OVERVIEW_WIDTH,
};
pub use npc::NpcRecord;
pub use participant::{
    ActivityStatus, Controller, Participant, SkipOutcome, AFK_SKIPS, IDLE_SKIPS,
};
pub use progress::CharacterProgress;
pub use session::{ActiveMap, OpeningCrawl, Session, SessionStatus, MAX_NARRATION};
pub use terrain::{
    CameraPreset, Connection, NamedPosition, Obstacle, PositionGroup, TerrainCatalog, TerrainMap, Zone,
    DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH, UNGROUPED_ZONE,
};
pub use token::{Token, TokenKind, TokenStyle};
