//! Value objects - validated, immutable building blocks.

mod game_mode;
mod names;
mod wound;

pub use game_mode::{ActionPolicy, GameMode, ModeTransition};
pub use names::{
    bounded_text, AdventureId, CharacterName, MapId, PositionName, ViewerId, BOT_CONTROLLER,
    MAX_CHARACTER_NAME, MAX_VIEWER_ID,
};
pub use wound::WoundLevel;
