//! Map tokens.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{CharacterName, MapId, PositionName};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    #[default]
    Pc,
    Npc,
    Vehicle,
}

impl TokenKind {
    pub fn default_color(self) -> &'static str {
        match self {
            TokenKind::Pc => "#4e9af5",
            TokenKind::Npc => "#f54e4e",
            TokenKind::Vehicle => "#8899aa",
        }
    }
}

impl FromStr for TokenKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pc" => Ok(TokenKind::Pc),
            "npc" => Ok(TokenKind::Npc),
            "vehicle" => Ok(TokenKind::Vehicle),
            other => Err(DomainError::validation(format!(
                "Unknown token kind '{other}' (expected pc, npc or vehicle)"
            ))),
        }
    }
}

/// A character's marker on one map, resolved to pixel coordinates from the
/// terrain's named position when it was placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub character_name: CharacterName,
    pub map: MapId,
    pub position: PositionName,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub kind: TokenKind,
    pub color: String,
    #[serde(default)]
    pub hidden: bool,
}

/// Presentation options carried through a move or transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStyle {
    pub kind: Option<TokenKind>,
    pub color: Option<String>,
    pub hidden: bool,
}

impl TokenStyle {
    /// Resolve kind and colour, falling back to what the token already had,
    /// then to `fallback` and the kind's default colour.
    pub fn resolve(
        &self,
        previous: Option<&Token>,
        fallback: TokenKind,
    ) -> Result<(TokenKind, String), DomainError> {
        let kind = self
            .kind
            .or_else(|| previous.map(|t| t.kind))
            .unwrap_or(fallback);
        let color = match (&self.color, previous) {
            (Some(color), _) => validate_color(color)?,
            (None, Some(token)) if token.kind == kind => token.color.clone(),
            _ => kind.default_color().to_string(),
        };
        Ok((kind, color))
    }
}

fn validate_color(color: &str) -> Result<String, DomainError> {
    let hex = color.strip_prefix('#').unwrap_or(color);
    if !matches!(hex.len(), 3 | 6) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(DomainError::validation(format!("Invalid token colour: {color:?}")));
    }
    Ok(format!("#{}", hex.to_ascii_lowercase()))
}
