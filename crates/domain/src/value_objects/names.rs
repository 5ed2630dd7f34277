//! Validated identifier and name newtypes
//!
//! These newtypes make the path-forming and chat-supplied inputs valid by
//! construction:
//! - Non-empty and trimmed (except positions, which match terrain keys exactly)
//! - Within the length caps that keep untrusted chat input bounded
//! - Slug-shaped where the value ends up in a file name

use std::fmt;
use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Maximum length for character names
pub const MAX_CHARACTER_NAME: usize = 50;

/// Maximum length for viewer identities handed over by the chat transport
pub const MAX_VIEWER_ID: usize = 25;

/// Maximum length for named positions
const MAX_POSITION_NAME: usize = 100;

/// Reserved controller name for the automated stand-in
pub const BOT_CONTROLLER: &str = "bot";

#[allow(clippy::unwrap_used)]
static SLUG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_\-]+$").unwrap());

#[allow(clippy::unwrap_used)]
static MAP_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_\-]+(\.[A-Za-z0-9]+)?$").unwrap());

/// Reject text that exceeds `max` characters.
pub fn bounded_text(label: &str, value: impl Into<String>, max: usize) -> Result<String, DomainError> {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.chars().count() > max {
        return Err(DomainError::validation(format!(
            "{label} cannot exceed {max} characters"
        )));
    }
    Ok(trimmed.to_string())
}

// ============================================================================
// CharacterName
// ============================================================================

/// A validated character name (non-empty, <=50 chars, trimmed)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CharacterName(String);

impl CharacterName {
    /// Create a new validated character name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the trimmed name is empty or
    /// longer than 50 characters.
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("Character name cannot be empty"));
        }
        if trimmed.chars().count() > MAX_CHARACTER_NAME {
            return Err(DomainError::validation(format!(
                "Character name cannot exceed {} characters",
                MAX_CHARACTER_NAME
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File-safe slug: lower case, spaces to hyphens, everything outside
    /// `a-z0-9-` dropped. Empty when nothing survives.
    pub fn slug(&self) -> String {
        self.0
            .to_lowercase()
            .replace(' ', "-")
            .chars()
            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
            .collect()
    }
}

impl fmt::Display for CharacterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CharacterName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<CharacterName> for String {
    fn from(name: CharacterName) -> String {
        name.0
    }
}

// ============================================================================
// ViewerId
// ============================================================================

/// A chat viewer identity, lower-cased (non-empty, <=25 chars).
///
/// The transport layer has already authenticated the viewer; this type only
/// normalises the handle. `bot` is reserved for the automated stand-in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ViewerId(String);

impl ViewerId {
    pub fn new(viewer: impl Into<String>) -> Result<Self, DomainError> {
        let viewer = viewer.into();
        let normalized = viewer.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(DomainError::validation("Viewer id cannot be empty"));
        }
        if normalized.chars().count() > MAX_VIEWER_ID {
            return Err(DomainError::validation(format!(
                "Viewer id cannot exceed {} characters",
                MAX_VIEWER_ID
            )));
        }
        if normalized == BOT_CONTROLLER {
            return Err(DomainError::validation("Viewer id 'bot' is reserved"));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ViewerId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ViewerId> for String {
    fn from(id: ViewerId) -> String {
        id.0
    }
}

// ============================================================================
// MapId
// ============================================================================

/// A map image identifier such as `mos-eisley-streets.svg`.
///
/// The base name (before the extension) selects the terrain file, so it must
/// be a plain slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MapId(String);

impl MapId {
    pub fn new(map: impl Into<String>) -> Result<Self, DomainError> {
        let map = map.into();
        let map = map.trim();
        if !MAP_FILE.is_match(map) {
            return Err(DomainError::validation(format!("Invalid map filename: {map:?}")));
        }
        Ok(Self(map.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The file name without its extension.
    pub fn base(&self) -> &str {
        match self.0.rsplit_once('.') {
            Some((base, _)) => base,
            None => &self.0,
        }
    }

    /// Two ids name the same map when their base names match, so
    /// `cantina` and `cantina.svg` are one map.
    pub fn same_map(&self, other: &MapId) -> bool {
        self.base() == other.base()
    }

    /// Human display name derived from the base name (`mos-eisley` -> `Mos Eisley`).
    pub fn display_name(&self) -> String {
        self.base()
            .split(['-', '_'])
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for MapId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<MapId> for String {
    fn from(id: MapId) -> String {
        id.0
    }
}

// ============================================================================
// PositionName
// ============================================================================

/// A named position on a map. Matched case-sensitively against terrain keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PositionName(String);

impl PositionName {
    pub fn new(position: impl Into<String>) -> Result<Self, DomainError> {
        let position = position.into();
        if position.trim().is_empty() {
            return Err(DomainError::validation("Position name cannot be empty"));
        }
        if position.chars().count() > MAX_POSITION_NAME {
            return Err(DomainError::validation(format!(
                "Position name cannot exceed {} characters",
                MAX_POSITION_NAME
            )));
        }
        Ok(Self(position))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PositionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for PositionName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<PositionName> for String {
    fn from(name: PositionName) -> String {
        name.0
    }
}

// ============================================================================
// AdventureId
// ============================================================================

/// Adventure slug, e.g. `escape-from-mos-eisley`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AdventureId(String);

impl AdventureId {
    pub fn new(adventure: impl Into<String>) -> Result<Self, DomainError> {
        let adventure = adventure.into();
        let adventure = adventure.trim();
        if !SLUG.is_match(adventure) {
            return Err(DomainError::validation(format!(
                "Invalid adventure name: {adventure:?}"
            )));
        }
        Ok(Self(adventure.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AdventureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for AdventureId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<AdventureId> for String {
    fn from(id: AdventureId) -> String {
        id.0
    }
}
