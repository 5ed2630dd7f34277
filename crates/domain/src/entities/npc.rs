use serde::{Deserialize, Serialize};

use crate::value_objects::{CharacterName, WoundLevel};

/// Narrator-run character tracked only for its wound track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpcRecord {
    pub name: CharacterName,
    #[serde(default)]
    pub wound_level: WoundLevel,
}

impl NpcRecord {
    pub fn new(name: CharacterName) -> Self {
        Self {
            name,
            wound_level: WoundLevel::Healthy,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.wound_level.is_dead()
    }
}
