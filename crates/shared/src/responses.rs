//! Success payloads. Each carries enough of the new state for the caller to
//! render a confirmation without a second read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gamenight_domain::{
    ActionLogEntry, ActiveMap, Camera, GameMode, OpeningCrawl, Participant, PositionGroup, Session, Token,
    WoundLevel,
};

use crate::views::{
    ActivityView, ContextView, IdleView, SkipView, StatusView, TimerView, TurnView,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum CommandResponse {
    SessionStarted {
        session: Session,
        participants: Vec<Participant>,
    },
    SessionEnded {
        session: Session,
        archived_to: String,
    },
    Joined {
        character: String,
        viewer: String,
        previous_controller: Option<String>,
        released: Option<String>,
    },
    Left {
        character: String,
        viewer: String,
    },
    ModeChanged {
        from: GameMode,
        to: GameMode,
    },
    CombatStarted {
        initiative: Vec<String>,
        current: String,
        round: u32,
        deadline: DateTime<Utc>,
        map_switched_to: Option<String>,
    },
    TurnAdvanced {
        turn: TurnView,
    },
    AutoAdvanced {
        advanced: bool,
        timer: TimerView,
        turn: Option<TurnView>,
        skipped: Option<SkipView>,
    },
    CombatEnded {
        cleared: bool,
        mode: GameMode,
    },
    Timer {
        timer: TimerView,
    },
    ActionLogged {
        entry: ActionLogEntry,
    },
    TokenPlaced {
        token: Token,
    },
    TokenRemoved {
        token: Token,
    },
    TokenTransferred {
        token: Token,
        from_map: String,
        from_position: String,
        resolved_via: String,
    },
    MapChanged {
        active_map: ActiveMap,
        tokens_cleared: bool,
    },
    Positions {
        map: String,
        groups: Vec<PositionGroup>,
    },
    CameraSet {
        camera: Camera,
    },
    IdleReport {
        idle: Vec<IdleView>,
    },
    ActivitySummary {
        characters: Vec<ActivityView>,
    },
    Points {
        character: String,
        character_points: u32,
        force_points: u32,
    },
    Wound {
        character: String,
        level: WoundLevel,
        npc: bool,
    },
    DiceLogged {
        character: String,
        total: i32,
        kept: usize,
    },
    SceneUpdated {
        act: String,
        scene: String,
        narration: String,
    },
    CrawlSet {
        crawl: OpeningCrawl,
    },
    Status(StatusView),
    Context(ContextView),
}

impl CommandResponse {
    /// One-line confirmation suitable for posting straight to chat.
    pub fn summary(&self) -> String {
        match self {
            CommandResponse::SessionStarted {
                session,
                participants,
            } => format!(
                "Session started: {} ({} pre-generated characters)",
                session.adventure,
                participants.len()
            ),
            CommandResponse::SessionEnded { session, .. } => format!(
                "Session ended: {}{}",
                session.adventure,
                if session.canon { " (canon)" } else { "" }
            ),
            CommandResponse::Joined {
                character,
                viewer,
                released,
                ..
            } => match released {
                Some(old) => format!("{viewer} now plays {character} ({old} handed to the bot)"),
                None => format!("{viewer} now plays {character}"),
            },
            CommandResponse::Left { character, viewer } => {
                format!("{viewer} left; the bot takes over {character}")
            }
            CommandResponse::ModeChanged { from, to } if from == to => format!("Mode is already {to}"),
            CommandResponse::ModeChanged { from, to } => format!("Mode: {from} -> {to}"),
            CommandResponse::CombatStarted {
                initiative,
                current,
                ..
            } => format!(
                "Initiative: {}. {current}'s turn.",
                initiative.join(" > ")
            ),
            CommandResponse::TurnAdvanced { turn } => {
                format!("Round {}: {}'s turn.", turn.round, turn.current)
            }
            CommandResponse::AutoAdvanced {
                turn: Some(turn),
                skipped,
                ..
            } => match skipped {
                Some(s) if s.became_afk => format!(
                    "{} timed out and is now AFK (bot controls). {}'s turn.",
                    s.character, turn.current
                ),
                Some(s) => format!(
                    "{} timed out ({} missed). {}'s turn.",
                    s.character, s.skip_count, turn.current
                ),
                None => format!("Timer expired. {}'s turn.", turn.current),
            },
            CommandResponse::AutoAdvanced { timer, .. } | CommandResponse::Timer { timer } => {
                match (&timer.current, timer.remaining_secs) {
                    (Some(current), Some(secs)) if timer.expired => {
                        format!("{current}'s turn has expired ({secs}s left)")
                    }
                    (Some(current), Some(secs)) => format!("{current}'s turn: {secs}s left"),
                    _ => format!("No turn timer running (mode: {})", timer.mode),
                }
            }
            CommandResponse::CombatEnded { cleared: true, mode } => {
                format!("Combat ended. Mode: {mode}")
            }
            CommandResponse::CombatEnded { mode, .. } => format!("No combat to end. Mode: {mode}"),
            CommandResponse::ActionLogged { entry } => {
                format!("{}: {}", entry.character_name, entry.summary)
            }
            CommandResponse::TokenPlaced { token } => format!(
                "Token {} -> {} on {}{}",
                token.character_name,
                token.position,
                token.map,
                if token.hidden { " [hidden]" } else { "" }
            ),
            CommandResponse::TokenRemoved { token } => {
                format!("Token removed: {}", token.character_name)
            }
            CommandResponse::TokenTransferred {
                token, from_map, ..
            } => format!(
                "{}: {from_map} -> {} ({})",
                token.character_name, token.map, token.position
            ),
            CommandResponse::MapChanged {
                active_map,
                tokens_cleared,
            } => format!(
                "Map: {} ({}){}",
                active_map.name,
                active_map.id,
                if *tokens_cleared { ", tokens cleared" } else { "" }
            ),
            CommandResponse::Positions { map, groups } => format!(
                "{map}: {} positions in {} zones",
                groups.iter().map(|g| g.positions.len()).sum::<usize>(),
                groups.len()
            ),
            CommandResponse::CameraSet { camera } => format!(
                "Camera: {} ({}, {}) zoom {}",
                camera.label(),
                camera.x,
                camera.y,
                camera.zoom
            ),
            CommandResponse::IdleReport { idle } if idle.is_empty() => {
                "Everyone is active".to_string()
            }
            CommandResponse::IdleReport { idle } => idle
                .iter()
                .map(|i| format!("{} ({}, {} missed)", i.character, i.status, i.skip_count))
                .collect::<Vec<_>>()
                .join(", "),
            CommandResponse::ActivitySummary { characters } => characters
                .iter()
                .map(|c| format!("{}: {}", c.character, c.actions))
                .collect::<Vec<_>>()
                .join(", "),
            CommandResponse::Points {
                character,
                character_points,
                force_points,
            } => format!("{character}: {character_points} CP, {force_points} FP"),
            CommandResponse::Wound {
                character, level, ..
            } => format!("{character} is {level}"),
            CommandResponse::DiceLogged {
                character, total, ..
            } => format!("{character} rolled {total}"),
            CommandResponse::SceneUpdated { act, scene, .. } => {
                format!("Act {act}: {scene}")
            }
            CommandResponse::CrawlSet { crawl } => format!("Opening crawl set: {}", crawl.title),
            CommandResponse::Status(status) => match &status.session {
                Some(session) => format!(
                    "{} [{}] {} participants",
                    session.adventure,
                    session.mode,
                    status.participants.len()
                ),
                None => "No active session".to_string(),
            },
            CommandResponse::Context(context) => {
                format!("{} [{}] act {}", context.adventure, context.mode, context.act)
            }
        }
    }
}

/// Success body on the wire: a chat-ready message plus the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandReply {
    pub message: String,
    #[serde(flatten)]
    pub response: CommandResponse,
}

impl From<CommandResponse> for CommandReply {
    fn from(response: CommandResponse) -> Self {
        Self {
            message: response.summary(),
            response,
        }
    }
}
