//! Movement use cases: token placement, cross-map transfer, the active map
//! and the overlay camera.

mod camera;
mod move_token;
mod scene_change;
mod transfer_token;

pub use camera::SetCamera;
pub use move_token::{MoveToken, RemoveToken};
pub use scene_change::{ListPositions, SetMap, SwitchScene};
pub use transfer_token::TransferToken;

use std::sync::Arc;

/// Container for movement use cases.
pub struct MovementUseCases {
    pub move_token: Arc<MoveToken>,
    pub remove_token: Arc<RemoveToken>,
    pub transfer_token: Arc<TransferToken>,
    pub set_map: Arc<SetMap>,
    pub switch_scene: Arc<SwitchScene>,
    pub list_positions: Arc<ListPositions>,
    pub set_camera: Arc<SetCamera>,
}

impl MovementUseCases {
    pub fn new(
        move_token: Arc<MoveToken>,
        remove_token: Arc<RemoveToken>,
        transfer_token: Arc<TransferToken>,
        set_map: Arc<SetMap>,
        switch_scene: Arc<SwitchScene>,
        list_positions: Arc<ListPositions>,
        set_camera: Arc<SetCamera>,
    ) -> Self {
        Self {
            move_token,
            remove_token,
            transfer_token,
            set_map,
            switch_scene,
            list_positions,
            set_camera,
        }
    }
}
