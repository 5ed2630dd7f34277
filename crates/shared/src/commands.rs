//! Command surface - one variant per command a transport can dispatch.
//!
//! Arguments arrive as raw strings and are validated by the engine, so a bad
//! name surfaces as a `validation_error` with a chat-ready message instead of
//! a JSON parse failure.

use serde::{Deserialize, Serialize};

fn one() -> u32 {
    1
}

/// A command as posted by the chat transport:
/// `{"command": "log-action", "viewerId": "renn", "character": "Kira", "text": "fires"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "command",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum Command {
    // Session lifecycle
    Init {
        adventure_id: String,
        #[serde(default)]
        bot_characters: Vec<String>,
        #[serde(default)]
        turn_timeout_secs: Option<u64>,
    },
    EndSession {
        #[serde(default)]
        canon: bool,
    },

    // Participants
    Join {
        viewer_id: String,
        character: String,
    },
    Leave {
        viewer_id: String,
    },

    // Turn & mode
    SetMode {
        mode: String,
    },
    Initiative {
        characters: Vec<String>,
        #[serde(default)]
        timeout_seconds: Option<u64>,
    },
    NextTurn,
    EndCombat,
    AutoAdvance,
    CheckTimer,
    LogAction {
        viewer_id: String,
        character: String,
        text: String,
        #[serde(default)]
        kind: Option<String>,
    },

    // Positions
    MoveToken {
        character: String,
        map: String,
        position: String,
        #[serde(default)]
        color: Option<String>,
        #[serde(default)]
        hidden: bool,
        #[serde(default)]
        kind: Option<String>,
    },
    RemoveToken {
        character: String,
    },
    SetMap {
        image: String,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        clear_tokens: bool,
    },
    SwitchScene {
        map: String,
        #[serde(default)]
        name: Option<String>,
    },
    TransferToken {
        character: String,
        to_map: String,
        #[serde(default)]
        position: Option<String>,
    },
    ListPositions {
        #[serde(default)]
        map: Option<String>,
    },
    /// Aim the overlay camera. Checked in order: `followParty`, `position`,
    /// `preset`, then `x`/`y`. `zoom` may accompany any of them or stand alone.
    SetCamera {
        #[serde(default)]
        position: Option<String>,
        #[serde(default)]
        preset: Option<String>,
        #[serde(default)]
        x: Option<i32>,
        #[serde(default)]
        y: Option<i32>,
        #[serde(default)]
        zoom: Option<f64>,
        #[serde(default)]
        follow_party: bool,
    },

    // Activity
    CheckIdle,
    ActivitySummary,

    // Opaque character data
    AwardCp {
        character: String,
        points: u32,
    },
    SpendCp {
        character: String,
        #[serde(default = "one")]
        points: u32,
    },
    SpendFp {
        character: String,
    },
    Wound {
        character: String,
        level: u8,
    },
    LogDice {
        character: String,
        skill: String,
        total: i32,
        #[serde(default)]
        detail: String,
        #[serde(default)]
        difficulty: Option<i32>,
        #[serde(default)]
        success: Option<bool>,
    },

    // Narrative
    UpdateScene {
        #[serde(default)]
        act: Option<String>,
        #[serde(default)]
        scene: Option<String>,
        #[serde(default)]
        narration: Option<String>,
    },
    SetCrawl {
        title: String,
        episode_title: String,
        paragraphs: Vec<String>,
    },

    // Reads
    Status,
    Context,
}

impl Command {
    /// The kebab-case wire name, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Init { .. } => "init",
            Command::EndSession { .. } => "end-session",
            Command::Join { .. } => "join",
            Command::Leave { .. } => "leave",
            Command::SetMode { .. } => "set-mode",
            Command::Initiative { .. } => "initiative",
            Command::NextTurn => "next-turn",
            Command::EndCombat => "end-combat",
            Command::AutoAdvance => "auto-advance",
            Command::CheckTimer => "check-timer",
            Command::LogAction { .. } => "log-action",
            Command::MoveToken { .. } => "move-token",
            Command::RemoveToken { .. } => "remove-token",
            Command::SetMap { .. } => "set-map",
            Command::SwitchScene { .. } => "switch-scene",
            Command::TransferToken { .. } => "transfer-token",
            Command::ListPositions { .. } => "list-positions",
            Command::SetCamera { .. } => "set-camera",
            Command::CheckIdle => "check-idle",
            Command::ActivitySummary => "activity-summary",
            Command::AwardCp { .. } => "award-cp",
            Command::SpendCp { .. } => "spend-cp",
            Command::SpendFp { .. } => "spend-fp",
            Command::Wound { .. } => "wound",
            Command::LogDice { .. } => "log-dice",
            Command::UpdateScene { .. } => "update-scene",
            Command::SetCrawl { .. } => "set-crawl",
            Command::Status => "status",
            Command::Context => "context",
        }
    }

    /// Commands that never write the session record.
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            Command::CheckTimer
                | Command::ListPositions { .. }
                | Command::CheckIdle
                | Command::ActivitySummary
                | Command::Status
                | Command::Context
        )
    }
}
