//! Cross-map transfer.

use std::sync::Arc;

use gamenight_domain::{CharacterName, MapId, PositionName, TerrainCatalog, TokenTransferred};

use crate::error::EngineError;
use crate::infrastructure::ports::ClockPort;
use crate::infrastructure::StateStore;

/// Move a token to another map.
///
/// Without an explicit position the entry point comes from the terrain's
/// connection tables, falling back to the destination's default entry.
pub struct TransferToken {
    store: Arc<StateStore>,
    clock: Arc<dyn ClockPort>,
    terrain: Arc<dyn TerrainCatalog>,
}

impl TransferToken {
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
        to_map: MapId,
        position: Option<PositionName>,
    ) -> Result<TokenTransferred, EngineError> {
        let now = self.clock.now();
        let moved = self
            .store
            .mutate_checked(|record| {
                Ok(record.transfer_token(self.terrain.as_ref(), &character, to_map, position, now)?)
            })
            .await?;
        tracing::info!(
            character = %moved.token.character_name,
            from_map = %moved.from_map,
            to_map = %moved.token.map,
            position = %moved.token.position,
            resolution = ?moved.resolution,
            "Token transferred"
        );
        Ok(moved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::movement::MoveToken;
    use crate::use_cases::test_support::{map, name, Harness};
    use gamenight_domain::{DomainError, TokenStyle};

    #[tokio::test]
    async fn resolves_entry_through_connection_table() {
        let h = Harness::with_session().await;
        MoveToken::new(h.store.clone(), h.clock.port(), h.terrain.clone())
            .execute(
                name("Kira"),
                map("cantina.svg"),
                PositionName::new("bar-stool-l3").unwrap(),
                TokenStyle::default(),
            )
            .await
            .unwrap();

        let moved = TransferToken::new(h.store.clone(), h.clock.port(), h.terrain.clone())
            .execute(name("Kira"), map("streets.svg"), None)
            .await
            .unwrap();

        assert_eq!(moved.token.map, map("streets.svg"));
        assert_eq!(moved.token.position.as_str(), "cantina-door");
        assert_eq!(
            h.snapshot().await.token(&name("Kira")).unwrap().position.as_str(),
            "cantina-door"
        );
    }

    #[tokio::test]
    async fn transfer_without_token_is_not_found() {
        let h = Harness::with_session().await;

        let err = TransferToken::new(h.store.clone(), h.clock.port(), h.terrain.clone())
            .execute(name("Renn"), map("streets.svg"), None)
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::Domain(DomainError::NotFound { .. })));
    }
}
