//! Overlay camera aiming.

use std::sync::Arc;

use gamenight_domain::{Camera, CameraAim, TerrainCatalog};

use crate::error::EngineError;
use crate::infrastructure::ports::ClockPort;
use crate::infrastructure::StateStore;

/// Point the overlay camera at a position, preset, coordinates or the party.
pub struct SetCamera {
    store: Arc<StateStore>,
    clock: Arc<dyn ClockPort>,
    terrain: Arc<dyn TerrainCatalog>,
}

impl SetCamera {
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

    pub async fn execute(&self, aim: CameraAim, zoom: Option<f64>) -> Result<Camera, EngineError> {
        let now = self.clock.now();
        let camera = self
            .store
            .mutate_checked(|record| Ok(record.set_camera(self.terrain.as_ref(), aim, zoom, now)?))
            .await?;
        tracing::info!(
            aim = %camera.target,
            x = camera.x,
            y = camera.y,
            zoom = %camera.zoom,
            "Camera set"
        );
        Ok(camera)
    }
}
