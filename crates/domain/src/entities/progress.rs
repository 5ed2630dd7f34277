//! Character progression carried from one canon session to the next.
//!
//! Stored in the player file next to whatever else the sheet holds, so the
//! keys stay snake_case like the rest of the sheet.

use serde::{Deserialize, Serialize};

use super::participant::{Participant, STARTING_CHARACTER_POINTS, STARTING_FORCE_POINTS};
use crate::value_objects::{CharacterName, WoundLevel};

fn starting_character_points() -> u32 {
    STARTING_CHARACTER_POINTS
}

fn starting_force_points() -> u32 {
    STARTING_FORCE_POINTS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterProgress {
    pub name: CharacterName,
    #[serde(default)]
    pub wound_level: WoundLevel,
    #[serde(default = "starting_character_points")]
    pub character_points: u32,
    #[serde(default = "starting_force_points")]
    pub force_points: u32,
    #[serde(default)]
    pub dark_side_points: u32,
    #[serde(default)]
    pub sessions_played: u32,
}

impl CharacterProgress {
    /// Counters as a participant finished a canon session, one more session
    /// played than `previous` recorded.
    pub fn after_session(participant: &Participant, previous: Option<&CharacterProgress>) -> Self {
        Self {
            name: participant.character_name().clone(),
            wound_level: participant.wound_level(),
            character_points: participant.character_points(),
            force_points: participant.force_points(),
            dark_side_points: participant.dark_side_points(),
            sessions_played: previous.map_or(0, |p| p.sessions_played) + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_sessions_on_top_of_previous() {
        let mut kira = Participant::bot(CharacterName::new("Kira").unwrap());
        kira.award_character_points(4);
        kira.set_wound_level(WoundLevel::Wounded);

        let first = CharacterProgress::after_session(&kira, None);
        assert_eq!(first.sessions_played, 1);
        assert_eq!(first.character_points, 9);
        assert_eq!(first.wound_level, WoundLevel::Wounded);

        let second = CharacterProgress::after_session(&kira, Some(&first));
        assert_eq!(second.sessions_played, 2);
    }

    #[test]
    fn missing_fields_take_starting_values() {
        let progress: CharacterProgress = serde_json::from_str(r#"{"name":"Kira"}"#).unwrap();
        assert_eq!(progress.character_points, 5);
        assert_eq!(progress.force_points, 1);
        assert_eq!(progress.wound_level, WoundLevel::Healthy);
    }
}
