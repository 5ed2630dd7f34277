//! Place, replace and remove tokens.

use std::sync::Arc;

use gamenight_domain::{CharacterName, MapId, PositionName, TerrainCatalog, Token, TokenStyle};

use crate::error::EngineError;
use crate::infrastructure::ports::ClockPort;
use crate::infrastructure::StateStore;

/// Put a character's token on a named position, replacing any previous
/// token wholesale.
pub struct MoveToken {
    store: Arc<StateStore>,
    clock: Arc<dyn ClockPort>,
    terrain: Arc<dyn TerrainCatalog>,
}

impl MoveToken {
    pub fn new(
        store: Arc<StateStore>,
        clock: Arc<dyn ClockPort>,
        terrain: Arc<dyn TerrainCatalog>,
    ) -> Self {
        Self {
            store,
            clock,
            terrain,
        }
    }

    pub async fn execute(
        &self,
        character: CharacterName,
        map: MapId,
        position: PositionName,
        style: TokenStyle,
    ) -> Result<Token, EngineError> {
        let now = self.clock.now();
        let token = self
            .store
            .mutate_checked(|record| {
                Ok(record.move_token(self.terrain.as_ref(), character, map, position, style, now)?)
            })
            .await?;
        tracing::info!(
            character = %token.character_name,
            map = %token.map,
            position = %token.position,
            hidden = token.hidden,
            "Token placed"
        );
        Ok(token)
    }
}

pub struct RemoveToken {
    store: Arc<StateStore>,
    clock: Arc<dyn ClockPort>,
}

impl RemoveToken {
    pub fn new(store: Arc<StateStore>, clock: Arc<dyn ClockPort>) -> Self {
        Self { store, clock }
    }

    pub async fn execute(&self, character: CharacterName) -> Result<Token, EngineError> {
        let now = self.clock.now();
        let token = self
            .store
            .mutate_checked(|record| Ok(record.remove_token(&character, now)?))
            .await?;
        tracing::info!(character = %token.character_name, "Token removed");
        Ok(token)
    }
}
