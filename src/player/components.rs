//! Player-related components and tuning resources.

use bevy::prelude::*;

use crate::core::RopeType;

/// Marker component for the player entity (the rigid body).
#[derive(Component)]
pub struct Player;

/// Marker for the collider that trigger volumes react to.
#[derive(Component)]
pub struct PlayerHitbox;

/// Yaw holder between the body and the camera.
///
/// The body's rotation is locked by physics, so looking left and right
/// turns this child instead.
#[derive(Component)]
pub struct Orientation;

/// Where a hook rope leaves the player's hand.
#[derive(Component, Debug, Clone, Copy)]
pub struct HandSpawnPoint(pub RopeType);

/// Point in front of the camera that inspected objects move toward.
#[derive(Component)]
pub struct InspectPoint;

/// Tracks whether the body is standing on something.
#[derive(Component, Default)]
pub struct MovementState {
    pub is_grounded: bool,
}

/// Movement tuning for the rigid-body controller.
#[derive(Resource, Debug, Clone)]
pub struct PlayerConfig {
    /// Base movement speed in units per second
    pub move_speed: f32,
    /// Sprint speed multiplier
    pub sprint_multiplier: f32,
    /// Upward velocity applied on jump
    pub jump_velocity: f32,
    /// Horizontal acceleration while airborne
    pub air_acceleration: f32,
    /// Distance below the capsule that still counts as ground
    pub ground_check_distance: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 6.0,
            sprint_multiplier: 1.5,
            jump_velocity: 6.0,
            air_acceleration: 8.0,
            ground_check_distance: 0.15,
        }
    }
}

/// First-person camera tuning. Angles are in degrees.
#[derive(Resource, Debug, Clone)]
pub struct CameraConfig {
    pub fov: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,
    pub sensitivity_x: f32,
    pub sensitivity_y: f32,
    /// Scales raw mouse pixels into degrees
    pub multiplier: f32,
    /// How quickly the camera chases its target rotation
    pub smoothness: f32,
    /// Maximum roll while turning
    pub look_tilt_amount: f32,
    pub look_tilt_speed: f32,
    pub tilt_reset_speed: f32,
    /// Scales raw horizontal mouse pixels into a -1..1 tilt input
    pub tilt_input_scale: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 60.0,
            min_pitch: -90.0,
            max_pitch: 90.0,
            sensitivity_x: 180.0,
            sensitivity_y: 180.0,
            multiplier: 0.001,
            smoothness: 17.0,
            look_tilt_amount: 6.0,
            look_tilt_speed: 12.0,
            tilt_reset_speed: 10.0,
            tilt_input_scale: 0.1,
        }
    }
}
