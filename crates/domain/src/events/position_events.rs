//! Token placement events

use crate::entities::Token;
use crate::value_objects::{MapId, PositionName};

/// How a transfer picked its landing position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryResolution {
    /// Caller named the position
    Explicit,
    /// The token stood on an exit leading to the destination
    Exit { exit: String },
    /// Closest exit on the source map leading to the destination
    NearestExit { exit: String },
    /// Destination exit that leads back to the source map
    ReturnConnection { exit: String },
    /// Destination's declared default entry
    DefaultEntry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTransferred {
    pub token: Token,
    pub from_map: MapId,
    pub from_position: PositionName,
    pub resolution: EntryResolution,
}
