//! Player plugin - movement, camera, and player-related systems.

use bevy::prelude::*;

use super::components::*;
use super::movement;

/// Player plugin - handles player movement and the first-person camera.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerConfig>()
            .init_resource::<CameraConfig>();

        movement::setup_movement_systems(app);
    }
}
