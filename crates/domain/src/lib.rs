//! Session state domain: validated names, the session record aggregate and
//! the rules that keep it consistent. Pure and synchronous; callers pass in
//! `now` and a terrain catalog.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod events;
pub mod ids;
pub mod value_objects;

pub use aggregates::{
    hesitation_narration, turn_timeout, ActivityEntry, Actor, CameraAim, IdleEntry, SceneUpdate,
    SessionRecord, TimerStatus, TurnOrder, WoundRecorded, DEFAULT_TURN_TIMEOUT_SECS,
    MAX_TURN_TIMEOUT_SECS,
};
pub use entities::{
    ActionKind, ActionLogEntry, ActiveMap, ActivityStatus, Camera, CameraPreset, CameraTarget,
    CharacterProgress, Connection, Controller, DiceLogEntry, NamedPosition, NpcRecord, Obstacle, OpeningCrawl, Participant, PositionGroup, Session,
    SessionStatus, SkipOutcome, TerrainCatalog, TerrainMap, Token, TokenKind, TokenStyle, Zone,
    Zoom, MAX_ACTION_TEXT, MAX_NARRATION, MAX_ZOOM, MIN_ZOOM,
};
pub use error::DomainError;
pub use events::{
    AutoAdvanceOutcome, CombatEnded, CombatStarted, EntryResolution, ModeChanged,
    ParticipantJoined, ParticipantLeft, TokenTransferred, TurnAdvanced,
};
pub use ids::{ActionId, SessionId};
pub use value_objects::{
    bounded_text, ActionPolicy, AdventureId, CharacterName, GameMode, MapId, ModeTransition,
    PositionName, ViewerId, WoundLevel,
};
