//! Gamenight Shared - types exchanged between the engine and its transports
//!
//! - `Command`: the command surface, one variant per command
//! - `CommandResponse` / `CommandReply`: success payloads
//! - `CommandFailure` / `ErrorKind`: structured failures
//! - read models for `status` and `context`
//!
//! No business logic lives here; validation happens in the engine.

pub mod commands;
pub mod errors;
pub mod responses;
pub mod views;

pub use commands::Command;
pub use errors::{CommandFailure, ErrorKind};
pub use responses::{CommandReply, CommandResponse};
pub use views::{
    ActivityView, ContextView, IdleView, ParticipantView, SkipView, StatusView, TimerView,
    TurnView, CONTEXT_ACTIONS,
};
