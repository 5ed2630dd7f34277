//! Session - the singleton root of the session record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::SessionId;
use crate::value_objects::{bounded_text, AdventureId, GameMode, MapId};

/// Cap on scene, act and narration text.
pub const MAX_NARRATION: usize = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Active,
    Ended,
}

/// The map the overlay renders. Tokens on other maps stay in the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveMap {
    pub id: MapId,
    pub name: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningCrawl {
    pub title: String,
    pub episode_title: String,
    pub paragraphs: Vec<String>,
}

impl OpeningCrawl {
    pub fn new(
        title: impl Into<String>,
        episode_title: impl Into<String>,
        paragraphs: Vec<String>,
    ) -> Result<Self, DomainError> {
        let title = bounded_text("Crawl title", title, MAX_NARRATION)?;
        let episode_title = bounded_text("Episode title", episode_title, MAX_NARRATION)?;
        if title.is_empty() {
            return Err(DomainError::validation("Crawl title cannot be empty"));
        }
        if paragraphs.is_empty() {
            return Err(DomainError::validation("Crawl needs at least one paragraph"));
        }
        let paragraphs = paragraphs
            .into_iter()
            .map(|p| bounded_text("Crawl paragraph", p, crate::entities::MAX_ACTION_TEXT))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            title,
            episode_title,
            paragraphs,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: SessionId,
    pub adventure: AdventureId,
    pub status: SessionStatus,
    pub mode: GameMode,
    pub active_map: Option<ActiveMap>,
    #[serde(default)]
    pub act: String,
    #[serde(default)]
    pub scene: String,
    #[serde(default)]
    pub narration: String,
    #[serde(default)]
    pub crawl: Option<OpeningCrawl>,
    pub started_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub canon: bool,
}

impl Session {
    pub fn new(adventure: AdventureId, now: DateTime<Utc>) -> Self {
        Self {
            id: SessionId::new(),
            adventure,
            status: SessionStatus::Active,
            mode: GameMode::Rp,
            active_map: None,
            act: "1".to_string(),
            scene: String::new(),
            narration: String::new(),
            crawl: None,
            started_at: now,
            last_updated: now,
            ended_at: None,
            canon: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    pub fn active_map_id(&self) -> Option<&MapId> {
        self.active_map.as_ref().map(|m| &m.id)
    }
}
