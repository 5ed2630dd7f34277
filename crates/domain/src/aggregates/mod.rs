//! Aggregate roots - domain objects that own their related data
//!
//! The session record is the only aggregate. Its behaviour is split by
//! concern across the sibling modules, each adding an `impl SessionRecord`
//! block and returning events from mutations.

mod activity;
mod camera;
mod initiative;
mod narrative;
mod positions;
mod session_record;
mod turns;

pub use activity::{ActivityEntry, IdleEntry};
pub use camera::CameraAim;
pub use initiative::{turn_timeout, TurnOrder, DEFAULT_TURN_TIMEOUT_SECS, MAX_TURN_TIMEOUT_SECS};
pub use narrative::{SceneUpdate, WoundRecorded};
pub use session_record::SessionRecord;
pub use turns::{hesitation_narration, Actor, TimerStatus};
