//! Join/leave events

use crate::entities::Controller;
use crate::value_objects::{CharacterName, ViewerId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantJoined {
    pub character: CharacterName,
    pub viewer: ViewerId,
    /// Who held the character before; None for a new participant
    pub previous_controller: Option<Controller>,
    /// Character the viewer was playing before, now handed to the bot
    pub released: Option<CharacterName>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantLeft {
    pub character: CharacterName,
    pub viewer: ViewerId,
}
