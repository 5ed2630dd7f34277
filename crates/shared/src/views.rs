//! Read models built from a session record snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gamenight_domain::{
    ActionLogEntry, ActiveMap, ActivityEntry, Camera, ActivityStatus, DiceLogEntry, GameMode, IdleEntry,
    NpcRecord, OpeningCrawl, Participant, Session, SessionRecord, SkipOutcome, TimerStatus, Token,
    TurnAdvanced, WoundLevel,
};

/// Entries of the action log included in the narrator context.
pub const CONTEXT_ACTIONS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerView {
    pub mode: GameMode,
    pub current: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub remaining_secs: Option<i64>,
    pub expired: bool,
    pub round: u32,
}

impl From<TimerStatus> for TimerView {
    fn from(t: TimerStatus) -> Self {
        Self {
            mode: t.mode,
            current: t.current.map(String::from),
            deadline: t.deadline,
            remaining_secs: t.remaining_secs,
            expired: t.expired,
            round: t.round,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnView {
    pub previous: String,
    pub current: String,
    pub round: u32,
    pub deadline: DateTime<Utc>,
    pub map_switched_to: Option<String>,
}

impl From<TurnAdvanced> for TurnView {
    fn from(t: TurnAdvanced) -> Self {
        Self {
            previous: t.previous.into(),
            current: t.current.into(),
            round: t.round,
            deadline: t.deadline,
            map_switched_to: t.map_switched_to.map(String::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipView {
    pub character: String,
    pub skip_count: u32,
    pub status: ActivityStatus,
    pub became_afk: bool,
}

impl SkipView {
    pub fn new(character: impl Into<String>, skip: SkipOutcome) -> Self {
        Self {
            character: character.into(),
            skip_count: skip.skips,
            status: skip.status,
            became_afk: skip.became_afk,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdleView {
    pub character: String,
    pub controller: String,
    pub status: ActivityStatus,
    pub skip_count: u32,
}

impl From<IdleEntry> for IdleView {
    fn from(e: IdleEntry) -> Self {
        Self {
            character: e.character.into(),
            controller: e.controller.into(),
            status: e.status,
            skip_count: e.skip_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityView {
    pub character: String,
    pub actions: usize,
    pub last_action_at: Option<DateTime<Utc>>,
}

impl From<ActivityEntry> for ActivityView {
    fn from(e: ActivityEntry) -> Self {
        Self {
            character: e.character.into(),
            actions: e.actions,
            last_action_at: e.last_action_at,
        }
    }
}

/// Full snapshot for `status`. Present even without a session so callers can
/// check storage health.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusView {
    pub storage_healthy: bool,
    pub session: Option<Session>,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub initiative: Vec<String>,
    pub current_index: Option<usize>,
    pub timer: Option<TimerView>,
    #[serde(default)]
    pub tokens: Vec<Token>,
    #[serde(default)]
    pub npcs: Vec<NpcRecord>,
    #[serde(default)]
    pub dice_log: Vec<DiceLogEntry>,
    pub action_count: usize,
    pub camera: Option<Camera>,
}

impl StatusView {
    pub fn new(record: Option<&SessionRecord>, now: DateTime<Utc>, storage_healthy: bool) -> Self {
        match record {
            None => Self {
                storage_healthy,
                session: None,
                participants: Vec::new(),
                initiative: Vec::new(),
                current_index: None,
                timer: None,
                tokens: Vec::new(),
                npcs: Vec::new(),
                dice_log: Vec::new(),
                action_count: 0,
                camera: None,
            },
            Some(r) => Self {
                storage_healthy,
                session: Some(r.session().clone()),
                participants: r.participants().to_vec(),
                initiative: r.turn().order().iter().map(|c| c.to_string()).collect(),
                current_index: r.turn().current_index(),
                timer: Some(r.timer_status(now).into()),
                tokens: r.tokens().to_vec(),
                npcs: r.npcs().to_vec(),
                dice_log: r.dice_log().to_vec(),
                action_count: r.action_log().len(),
                camera: r.camera().cloned(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantView {
    pub character: String,
    pub controller: String,
    pub status: ActivityStatus,
    pub skip_count: u32,
    pub wound_level: WoundLevel,
}

/// What the narrator reads before writing the next beat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextView {
    pub adventure: String,
    pub active: bool,
    pub mode: GameMode,
    pub act: String,
    pub scene: String,
    pub narration: String,
    pub active_map: Option<ActiveMap>,
    pub crawl: Option<OpeningCrawl>,
    pub current_turn: Option<String>,
    pub round: u32,
    pub participants: Vec<ParticipantView>,
    pub recent_actions: Vec<ActionLogEntry>,
}

impl ContextView {
    pub fn new(record: &SessionRecord) -> Self {
        let session = record.session();
        let in_combat = session.mode == GameMode::Combat;
        Self {
            adventure: session.adventure.to_string(),
            active: session.is_active(),
            mode: session.mode,
            act: session.act.clone(),
            scene: session.scene.clone(),
            narration: session.narration.clone(),
            active_map: session.active_map.clone(),
            crawl: session.crawl.clone(),
            current_turn: record
                .turn()
                .current()
                .filter(|_| in_combat)
                .map(|c| c.to_string()),
            round: record.turn().round(),
            participants: record
                .participants()
                .iter()
                .map(|p| ParticipantView {
                    character: p.character_name().to_string(),
                    controller: p.controller().to_string(),
                    status: p.activity_status(),
                    skip_count: p.skip_count(),
                    wound_level: p.wound_level(),
                })
                .collect(),
            recent_actions: record.recent_actions(CONTEXT_ACTIONS).to_vec(),
        }
    }
}
