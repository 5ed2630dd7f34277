//! Participant - one controllable character in the session.
//!
//! A participant row exists whether a human viewer or the automated stand-in
//! drives the character. Control changes are a single field replacement, so
//! there is never a moment with two controllers or none.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::progress::CharacterProgress;
use crate::error::DomainError;
use crate::value_objects::{CharacterName, ViewerId, WoundLevel, BOT_CONTROLLER};

/// Skip count at which a participant is reported idle.
pub const IDLE_SKIPS: u32 = 2;

/// Skip count at which a participant is AFK and the bot takes over.
pub const AFK_SKIPS: u32 = 3;

pub(crate) const STARTING_CHARACTER_POINTS: u32 = 5;
pub(crate) const STARTING_FORCE_POINTS: u32 = 1;

/// Who is currently allowed to act as a character.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Controller {
    Viewer(ViewerId),
    Bot,
}

impl Controller {
    pub fn is_bot(&self) -> bool {
        matches!(self, Controller::Bot)
    }

    pub fn viewer(&self) -> Option<&ViewerId> {
        match self {
            Controller::Viewer(viewer) => Some(viewer),
            Controller::Bot => None,
        }
    }
}

impl fmt::Display for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Controller::Viewer(viewer) => write!(f, "{viewer}"),
            Controller::Bot => write!(f, "{BOT_CONTROLLER}"),
        }
    }
}

impl TryFrom<String> for Controller {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s.trim().eq_ignore_ascii_case(BOT_CONTROLLER) {
            Ok(Controller::Bot)
        } else {
            ViewerId::new(s).map(Controller::Viewer)
        }
    }
}

impl From<Controller> for String {
    fn from(controller: Controller) -> String {
        controller.to_string()
    }
}

/// Activity status, derived from the consecutive skip count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    #[default]
    Active,
    Idle,
    Afk,
}

impl ActivityStatus {
    /// `0-1 -> active`, `2 -> idle`, `>=3 -> afk`.
    pub fn from_skip_count(skips: u32) -> Self {
        match skips {
            s if s >= AFK_SKIPS => ActivityStatus::Afk,
            s if s >= IDLE_SKIPS => ActivityStatus::Idle,
            _ => ActivityStatus::Active,
        }
    }
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityStatus::Active => write!(f, "active"),
            ActivityStatus::Idle => write!(f, "idle"),
            ActivityStatus::Afk => write!(f, "afk"),
        }
    }
}

/// Result of charging a missed turn to a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkipOutcome {
    pub skips: u32,
    pub status: ActivityStatus,
    /// True only on the skip that crossed into AFK
    pub became_afk: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    character_name: CharacterName,
    controller: Controller,
    activity_status: ActivityStatus,
    skip_count: u32,
    last_action_at: Option<DateTime<Utc>>,
    #[serde(default)]
    joined_at: Option<DateTime<Utc>>,
    #[serde(default)]
    wound_level: WoundLevel,
    #[serde(default)]
    character_points: u32,
    #[serde(default)]
    force_points: u32,
    #[serde(default)]
    dark_side_points: u32,
}

impl Participant {
    /// A character taken by a human viewer.
    pub fn joined(character_name: CharacterName, viewer: ViewerId, now: DateTime<Utc>) -> Self {
        Self {
            joined_at: Some(now),
            ..Self::bot(character_name).with_controller(Controller::Viewer(viewer))
        }
    }

    /// A pre-generated character waiting for a viewer.
    pub fn bot(character_name: CharacterName) -> Self {
        Self {
            character_name,
            controller: Controller::Bot,
            activity_status: ActivityStatus::Active,
            skip_count: 0,
            last_action_at: None,
            joined_at: None,
            wound_level: WoundLevel::Healthy,
            character_points: STARTING_CHARACTER_POINTS,
            force_points: STARTING_FORCE_POINTS,
            dark_side_points: 0,
        }
    }

    fn with_controller(mut self, controller: Controller) -> Self {
        self.controller = controller;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn character_name(&self) -> &CharacterName {
        &self.character_name
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn activity_status(&self) -> ActivityStatus {
        self.activity_status
    }

    pub fn skip_count(&self) -> u32 {
        self.skip_count
    }

    pub fn last_action_at(&self) -> Option<DateTime<Utc>> {
        self.last_action_at
    }

    pub fn wound_level(&self) -> WoundLevel {
        self.wound_level
    }

    pub fn character_points(&self) -> u32 {
        self.character_points
    }

    pub fn force_points(&self) -> u32 {
        self.force_points
    }

    pub fn dark_side_points(&self) -> u32 {
        self.dark_side_points
    }

    pub fn is_controlled_by(&self, viewer: &ViewerId) -> bool {
        self.controller.viewer() == Some(viewer)
    }

    // =========================================================================
    // Control and activity
    // =========================================================================

    /// Hand the character to `viewer`. Rejoining always wins: skips and status
    /// are cleared no matter how far the character had drifted.
    pub fn reclaim(&mut self, viewer: ViewerId, now: DateTime<Utc>) -> Controller {
        let previous = std::mem::replace(&mut self.controller, Controller::Viewer(viewer));
        self.joined_at = Some(now);
        self.set_skip_count(0);
        previous
    }

    /// Give the character back to the automated stand-in.
    pub fn release_to_bot(&mut self) {
        self.controller = Controller::Bot;
    }

    /// An accepted action clears the skip streak.
    pub fn record_action(&mut self, now: DateTime<Utc>) {
        self.last_action_at = Some(now);
        self.set_skip_count(0);
    }

    /// Clear the skip streak without logging an action.
    pub fn clear_skips(&mut self) {
        self.set_skip_count(0);
    }

    /// Charge a missed turn. Crossing into AFK hands control to the bot.
    pub fn record_skip(&mut self) -> SkipOutcome {
        let was_afk = self.activity_status == ActivityStatus::Afk;
        self.set_skip_count(self.skip_count.saturating_add(1));
        let became_afk = !was_afk && self.activity_status == ActivityStatus::Afk;
        if became_afk {
            self.controller = Controller::Bot;
        }
        SkipOutcome {
            skips: self.skip_count,
            status: self.activity_status,
            became_afk,
        }
    }

    /// The only writer of `activity_status`, which keeps it a pure function of
    /// the skip count.
    fn set_skip_count(&mut self, skips: u32) {
        self.skip_count = skips;
        self.activity_status = ActivityStatus::from_skip_count(skips);
    }

    /// True when the stored status disagrees with the skip count, which only a
    /// hand-edited record can produce.
    pub fn status_is_consistent(&self) -> bool {
        self.activity_status == ActivityStatus::from_skip_count(self.skip_count)
    }

    // =========================================================================
    // Opaque counters
    // =========================================================================

    pub fn award_character_points(&mut self, points: u32) -> u32 {
        self.character_points = self.character_points.saturating_add(points);
        self.character_points
    }

    pub fn spend_character_points(&mut self, cost: u32) -> Result<u32, DomainError> {
        self.character_points = spend(&self.character_name, "CP", self.character_points, cost)?;
        Ok(self.character_points)
    }

    pub fn spend_force_points(&mut self, cost: u32) -> Result<u32, DomainError> {
        self.force_points = spend(&self.character_name, "FP", self.force_points, cost)?;
        Ok(self.force_points)
    }

    pub fn set_wound_level(&mut self, level: WoundLevel) {
        self.wound_level = level;
    }

    /// Take the counters a previous canon session left behind.
    pub fn restore(&mut self, progress: &CharacterProgress) {
        self.wound_level = progress.wound_level;
        self.character_points = progress.character_points;
        self.force_points = progress.force_points;
        self.dark_side_points = progress.dark_side_points;
    }
}

fn spend(name: &CharacterName, label: &str, balance: u32, cost: u32) -> Result<u32, DomainError> {
    balance.checked_sub(cost).ok_or_else(|| {
        DomainError::validation(format!("{name} has {balance} {label}, needs {cost}"))
    })
}
