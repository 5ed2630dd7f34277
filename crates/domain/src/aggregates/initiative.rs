//! Initiative sequence, turn pointer and per-turn deadline.
//!
//! Flattened into the persisted record as `initiative`, `currentIndex`,
//! `deadline` and friends, so overlay readers see plain top-level fields.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::CharacterName;

pub const DEFAULT_TURN_TIMEOUT_SECS: u64 = 120;
pub const MAX_TURN_TIMEOUT_SECS: u64 = 3600;

fn default_timeout() -> u64 {
    DEFAULT_TURN_TIMEOUT_SECS
}

/// Validate a per-turn timeout in seconds.
pub fn turn_timeout(secs: u64) -> Result<u64, DomainError> {
    if secs == 0 || secs > MAX_TURN_TIMEOUT_SECS {
        return Err(DomainError::validation(format!(
            "Turn timeout must be between 1 and {MAX_TURN_TIMEOUT_SECS} seconds"
        )));
    }
    Ok(secs)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnOrder {
    #[serde(default)]
    initiative: Vec<CharacterName>,
    #[serde(default)]
    current_index: Option<usize>,
    #[serde(default)]
    deadline: Option<DateTime<Utc>>,
    #[serde(default = "default_timeout")]
    turn_timeout_secs: u64,
    #[serde(default)]
    round: u32,
    #[serde(default)]
    acted_this_turn: bool,
}

impl Default for TurnOrder {
    fn default() -> Self {
        Self {
            initiative: Vec::new(),
            current_index: None,
            deadline: None,
            turn_timeout_secs: DEFAULT_TURN_TIMEOUT_SECS,
            round: 0,
            acted_this_turn: false,
        }
    }
}

impl TurnOrder {
    /// An empty sequence that will use `timeout_secs` for future turns.
    pub(crate) fn idle(timeout_secs: u64) -> Self {
        Self {
            turn_timeout_secs: timeout_secs,
            ..Self::default()
        }
    }

    /// Build a fresh sequence in exactly the given order, pointing at the
    /// first entry.
    pub fn start(
        order: Vec<CharacterName>,
        timeout_secs: u64,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if order.is_empty() {
            return Err(DomainError::validation("Initiative order cannot be empty"));
        }
        for (i, name) in order.iter().enumerate() {
            if order[..i].contains(name) {
                return Err(DomainError::validation(format!(
                    "{name} appears twice in the initiative order"
                )));
            }
        }
        let timeout_secs = turn_timeout(timeout_secs)?;
        let mut turn = Self {
            initiative: order,
            current_index: Some(0),
            deadline: None,
            turn_timeout_secs: timeout_secs,
            round: 1,
            acted_this_turn: false,
        };
        turn.refresh_deadline(now);
        Ok(turn)
    }

    pub fn order(&self) -> &[CharacterName] {
        &self.initiative
    }

    pub fn is_empty(&self) -> bool {
        self.initiative.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn current(&self) -> Option<&CharacterName> {
        self.current_index.and_then(|i| self.initiative.get(i))
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    pub fn timeout_secs(&self) -> u64 {
        self.turn_timeout_secs
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn acted_this_turn(&self) -> bool {
        self.acted_this_turn
    }

    pub(crate) fn mark_acted(&mut self) {
        self.acted_this_turn = true;
    }

    /// Seconds until the deadline, rounded up; negative once expired.
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> Option<i64> {
        self.deadline.map(|deadline| {
            let millis = (deadline - now).num_milliseconds();
            millis.div_euclid(1000) + i64::from(millis.rem_euclid(1000) != 0)
        })
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    pub(crate) fn refresh_deadline(&mut self, now: DateTime<Utc>) {
        let secs = self.turn_timeout_secs.min(MAX_TURN_TIMEOUT_SECS) as i64;
        self.deadline = Some(now + Duration::seconds(secs));
    }

    /// Move the pointer one step, wrapping to the start and bumping the round.
    /// Returns the new current character.
    pub(crate) fn advance(&mut self, now: DateTime<Utc>) -> Result<CharacterName, DomainError> {
        let len = self.initiative.len();
        let index = self
            .current_index
            .filter(|i| *i < len)
            .ok_or_else(|| DomainError::invariant("turn pointer outside initiative sequence"))?;
        let next = (index + 1) % len;
        if next == 0 {
            self.round = self.round.saturating_add(1);
        }
        self.current_index = Some(next);
        self.acted_this_turn = false;
        self.refresh_deadline(now);
        self.initiative
            .get(next)
            .cloned()
            .ok_or_else(|| DomainError::invariant("turn pointer outside initiative sequence"))
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::idle(self.turn_timeout_secs);
    }

    /// Pointer is a valid index into a non-empty sequence.
    pub fn pointer_is_valid(&self) -> bool {
        matches!(self.current_index, Some(i) if i < self.initiative.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 20, 0, 0).unwrap()
    }

    fn names(list: &[&str]) -> Vec<CharacterName> {
        list.iter().map(|n| CharacterName::new(*n).unwrap()).collect()
    }

    mod start {
        use super::*;

        #[test]
        fn keeps_given_order_and_sets_deadline() {
            let turn = TurnOrder::start(names(&["Kira", "Stormtrooper", "Adept"]), 120, now())
                .unwrap();
            assert_eq!(turn.order(), names(&["Kira", "Stormtrooper", "Adept"]).as_slice());
            assert_eq!(turn.current().map(|c| c.as_str()), Some("Kira"));
            assert_eq!(turn.deadline(), Some(now() + Duration::seconds(120)));
            assert_eq!(turn.round(), 1);
        }

        #[test]
        fn rejects_empty_and_duplicate_orders() {
            assert!(TurnOrder::start(vec![], 120, now()).is_err());
            assert!(TurnOrder::start(names(&["Kira", "Kira"]), 120, now()).is_err());
            assert!(TurnOrder::start(names(&["Kira"]), 0, now()).is_err());
            assert!(TurnOrder::start(names(&["Kira"]), MAX_TURN_TIMEOUT_SECS + 1, now()).is_err());
        }
    }

    mod advance {
        use super::*;

        #[test]
        fn wraps_and_counts_rounds() {
            let mut turn = TurnOrder::start(names(&["Kira", "Stormtrooper"]), 60, now()).unwrap();
            turn.mark_acted();
            let later = now() + Duration::seconds(10);
            assert_eq!(turn.advance(later).unwrap().as_str(), "Stormtrooper");
            assert!(!turn.acted_this_turn());
            assert_eq!(turn.round(), 1);
            assert_eq!(turn.deadline(), Some(later + Duration::seconds(60)));
            assert_eq!(turn.advance(later).unwrap().as_str(), "Kira");
            assert_eq!(turn.round(), 2);
        }

        #[test]
        fn empty_sequence_is_an_invariant_violation() {
            let mut turn = TurnOrder::default();
            assert!(matches!(
                turn.advance(now()),
                Err(DomainError::InvariantViolation(_))
            ));
        }
    }

    #[test]
    fn remaining_seconds_round_up() {
        let turn = TurnOrder::start(names(&["Kira"]), 120, now()).unwrap();
        let t = now() + Duration::milliseconds(500);
        assert_eq!(turn.remaining_secs(t), Some(120));
        assert!(!turn.is_expired(t));
        let t = now() + Duration::seconds(120);
        assert_eq!(turn.remaining_secs(t), Some(0));
        assert!(turn.is_expired(t));
    }

    #[test]
    fn clear_keeps_timeout_setting() {
        let mut turn = TurnOrder::start(names(&["Kira"]), 45, now()).unwrap();
        turn.clear();
        assert!(turn.is_empty());
        assert_eq!(turn.current_index(), None);
        assert_eq!(turn.deadline(), None);
        assert_eq!(turn.timeout_secs(), 45);
    }
}
