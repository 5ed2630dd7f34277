//! Position tracker: tokens, active map and cross-map transfers.

use chrono::{DateTime, Utc};

use super::session_record::SessionRecord;
use super::turns::active_map_for;
use crate::entities::{
    ActiveMap, PositionGroup, TerrainCatalog, TerrainMap, Token, TokenKind, TokenStyle,
};
use crate::error::DomainError;
use crate::events::{EntryResolution, TokenTransferred};
use crate::value_objects::{bounded_text, CharacterName, MapId, PositionName};

const MAX_MAP_NAME: usize = 100;

fn require_terrain(
    terrain: &dyn TerrainCatalog,
    map: &MapId,
) -> Result<std::sync::Arc<TerrainMap>, DomainError> {
    terrain
        .terrain(map)
        .ok_or_else(|| DomainError::validation(format!("No terrain data for '{map}'")))
}

impl SessionRecord {
    /// Place or move a token. The token is replaced wholesale; a failed
    /// lookup leaves any existing token untouched.
    pub fn move_token(
        &mut self,
        terrain: &dyn TerrainCatalog,
        character: CharacterName,
        map: MapId,
        position: PositionName,
        style: TokenStyle,
        now: DateTime<Utc>,
    ) -> Result<Token, DomainError> {
        self.ensure_active()?;
        let data = require_terrain(terrain, &map)?;
        let spot = data.require_position(&map, &position)?;

        let fallback = if self.participant(&character).is_some() {
            TokenKind::Pc
        } else {
            TokenKind::Npc
        };
        let (kind, color) = style.resolve(self.token(&character), fallback)?;
        let token = Token {
            character_name: character,
            map,
            position,
            x: spot.x,
            y: spot.y,
            kind,
            color,
            hidden: style.hidden,
        };
        self.put_token(token.clone());
        self.refresh_party_camera();
        self.touch(now);
        Ok(token)
    }

    pub fn remove_token(
        &mut self,
        character: &CharacterName,
        now: DateTime<Utc>,
    ) -> Result<Token, DomainError> {
        self.ensure_active()?;
        let index = self
            .tokens
            .iter()
            .position(|t| &t.character_name == character)
            .ok_or_else(|| DomainError::not_found("Token", character.as_str()))?;
        let removed = self.tokens.remove(index);
        self.refresh_party_camera();
        self.touch(now);
        Ok(removed)
    }

    /// Move a token to another map. Without an explicit position the landing
    /// spot comes from the connection tables, in this order: the exit the
    /// token stands on, the nearest exit on the source map leading to the
    /// destination, a destination exit leading back to the source, and the
    /// destination's default entry.
    pub fn transfer_token(
        &mut self,
        terrain: &dyn TerrainCatalog,
        character: &CharacterName,
        to_map: MapId,
        position: Option<PositionName>,
        now: DateTime<Utc>,
    ) -> Result<TokenTransferred, DomainError> {
        self.ensure_active()?;
        let current = self
            .token(character)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Token", character.as_str()))?;
        let target = require_terrain(terrain, &to_map)?;

        let (landing, resolution) = match position {
            Some(position) => (position, EntryResolution::Explicit),
            None => {
                let source = terrain.terrain(&current.map);
                let (name, resolution) =
                    resolve_entry(source.as_deref(), &current, &to_map, &target).ok_or_else(
                        || DomainError::NoConnection {
                            from_map: current.map.to_string(),
                            to_map: to_map.to_string(),
                        },
                    )?;
                (PositionName::new(name)?, resolution)
            }
        };
        let spot = target.require_position(&to_map, &landing)?;

        let token = Token {
            map: to_map,
            position: landing,
            x: spot.x,
            y: spot.y,
            ..current.clone()
        };
        self.put_token(token.clone());
        self.refresh_party_camera();
        self.touch(now);
        Ok(TokenTransferred {
            token,
            from_map: current.map,
            from_position: current.position,
            resolution,
        })
    }

    /// Change the rendered map, optionally clearing every token. The camera
    /// starts over from an overview of the new map.
    pub fn set_map(
        &mut self,
        terrain: &dyn TerrainCatalog,
        map: MapId,
        name: Option<String>,
        clear_tokens: bool,
        now: DateTime<Utc>,
    ) -> Result<ActiveMap, DomainError> {
        let active = self.switch_scene(terrain, map, name, now)?;
        if clear_tokens {
            self.tokens.clear();
        }
        self.reset_camera();
        Ok(active)
    }

    /// Change the rendered map only. Tokens on other maps stay where they are.
    pub fn switch_scene(
        &mut self,
        terrain: &dyn TerrainCatalog,
        map: MapId,
        name: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<ActiveMap, DomainError> {
        self.ensure_active()?;
        let name = name
            .map(|n| bounded_text("Map name", n, MAX_MAP_NAME))
            .transpose()?;
        let active = active_map_for(&map, name, terrain);
        self.session.active_map = Some(active.clone());
        self.reframe_scene();
        self.touch(now);
        Ok(active)
    }

    /// Named positions of `map` (default: the active map) grouped by zone.
    pub fn list_positions(
        &self,
        terrain: &dyn TerrainCatalog,
        map: Option<MapId>,
    ) -> Result<(MapId, Vec<PositionGroup>), DomainError> {
        let map = map
            .or_else(|| self.session.active_map_id().cloned())
            .ok_or_else(|| DomainError::validation("No map set. Use set-map first."))?;
        let data = require_terrain(terrain, &map)?;
        Ok((map, data.grouped_positions()))
    }

    /// Tokens on the active map; what the overlay renders.
    pub fn visible_tokens(&self) -> Vec<&Token> {
        match self.session.active_map_id() {
            Some(active) => self
                .tokens
                .iter()
                .filter(|t| t.map.same_map(active) && !t.hidden)
                .collect(),
            None => Vec::new(),
        }
    }

    fn put_token(&mut self, token: Token) {
        match self
            .tokens
            .iter_mut()
            .find(|t| t.character_name == token.character_name)
        {
            Some(slot) => *slot = token,
            None => self.tokens.push(token),
        }
    }
}

fn resolve_entry(
    source: Option<&TerrainMap>,
    token: &Token,
    to_map: &MapId,
    target: &TerrainMap,
) -> Option<(String, EntryResolution)> {
    if let Some(source) = source {
        if let Some(conn) = source
            .connection_from(token.position.as_str())
            .filter(|c| c.leads_to(to_map))
        {
            return Some((
                conn.position.clone(),
                EntryResolution::Exit {
                    exit: token.position.to_string(),
                },
            ));
        }

        let nearest = source.exits_to(to_map).min_by_key(|(_, _, spot)| {
            spot.map_or(i64::MAX, |s| {
                let dx = i64::from(s.x) - i64::from(token.x);
                let dy = i64::from(s.y) - i64::from(token.y);
                dx * dx + dy * dy
            })
        });
        if let Some((exit, conn, _)) = nearest {
            return Some((
                conn.position.clone(),
                EntryResolution::NearestExit {
                    exit: exit.to_string(),
                },
            ));
        }
    }

    if let Some((exit, _, _)) = target.exits_to(&token.map).next() {
        return Some((
            exit.to_string(),
            EntryResolution::ReturnConnection {
                exit: exit.to_string(),
            },
        ));
    }

    target
        .default_entry
        .clone()
        .map(|entry| (entry, EntryResolution::DefaultEntry))
}
