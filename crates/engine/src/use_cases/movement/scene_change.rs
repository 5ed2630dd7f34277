//! Active map changes and position listings.
//!
//! The overlay draws only tokens whose map is the active map; switching maps
//! never moves or deletes tokens unless `set-map` is asked to clear them.

use std::sync::Arc;

use gamenight_domain::{ActiveMap, DomainError, MapId, PositionGroup, TerrainCatalog};

use crate::error::EngineError;
use crate::infrastructure::ports::ClockPort;
use crate::infrastructure::StateStore;

/// Load a map image as the active map, optionally clearing every token.
pub struct SetMap {
    store: Arc<StateStore>,
    clock: Arc<dyn ClockPort>,
    terrain: Arc<dyn TerrainCatalog>,
}

impl SetMap {
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
        map: MapId,
        name: Option<String>,
        clear_tokens: bool,
    ) -> Result<ActiveMap, EngineError> {
        let now = self.clock.now();
        let active = self
            .store
            .mutate_checked(|record| {
                Ok(record.set_map(self.terrain.as_ref(), map, name, clear_tokens, now)?)
            })
            .await?;
        tracing::info!(map = %active.id, name = %active.name, clear_tokens, "Map set");
        Ok(active)
    }
}

/// Change which map is rendered. Tokens are untouched.
pub struct SwitchScene {
    store: Arc<StateStore>,
    clock: Arc<dyn ClockPort>,
    terrain: Arc<dyn TerrainCatalog>,
}

impl SwitchScene {
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

    pub async fn execute(&self, map: MapId, name: Option<String>) -> Result<ActiveMap, EngineError> {
        let now = self.clock.now();
        let active = self
            .store
            .mutate_checked(|record| {
                Ok(record.switch_scene(self.terrain.as_ref(), map, name, now)?)
            })
            .await?;
        tracing::info!(map = %active.id, name = %active.name, "Scene switched");
        Ok(active)
    }
}

/// Named positions of a map grouped by zone. Defaults to the active map.
pub struct ListPositions {
    store: Arc<StateStore>,
    terrain: Arc<dyn TerrainCatalog>,
}

impl ListPositions {
    pub fn new(store: Arc<StateStore>, terrain: Arc<dyn TerrainCatalog>) -> Self {
        Self { store, terrain }
    }

    pub async fn execute(
        &self,
        map: Option<MapId>,
    ) -> Result<(MapId, Vec<PositionGroup>), EngineError> {
        let record = self.store.read().await.ok_or(DomainError::NoActiveSession)?;
        Ok(record.list_positions(self.terrain.as_ref(), map)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::movement::MoveToken;
    use crate::use_cases::test_support::{map, name, Harness};
    use gamenight_domain::{PositionName, TokenStyle};

    async fn kira_in_cantina(h: &Harness) {
        MoveToken::new(h.store.clone(), h.clock.port(), h.terrain.clone())
            .execute(
                name("Kira"),
                map("cantina.svg"),
                PositionName::new("booth-1").unwrap(),
                TokenStyle::default(),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn switch_scene_leaves_tokens_alone() {
        let h = Harness::with_session().await;
        kira_in_cantina(&h).await;

        let active = SwitchScene::new(h.store.clone(), h.clock.port(), h.terrain.clone())
            .execute(map("streets.svg"), Some("Mos Eisley".to_string()))
            .await
            .unwrap();

        assert_eq!(active.name, "Mos Eisley");
        let snapshot = h.snapshot().await;
        assert_eq!(snapshot.tokens().len(), 1);
        assert!(snapshot.visible_tokens().is_empty());
    }

    #[tokio::test]
    async fn set_map_can_clear_tokens() {
        let h = Harness::with_session().await;
        kira_in_cantina(&h).await;

        SetMap::new(h.store.clone(), h.clock.port(), h.terrain.clone())
            .execute(map("streets.svg"), None, true)
            .await
            .unwrap();

        assert!(h.snapshot().await.tokens().is_empty());
    }

    #[tokio::test]
    async fn lists_active_map_by_zone() {
        let h = Harness::with_session().await;
        SwitchScene::new(h.store.clone(), h.clock.port(), h.terrain.clone())
            .execute(map("cantina.svg"), None)
            .await
            .unwrap();

        let (listed, groups) = ListPositions::new(h.store.clone(), h.terrain.clone())
            .execute(None)
            .await
            .unwrap();

        assert_eq!(listed, map("cantina.svg"));
        let zones: Vec<_> = groups.iter().map(|g| g.zone.as_str()).collect();
        assert_eq!(zones, vec!["bar", "other"]);
    }
}
