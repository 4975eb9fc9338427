//! Frame-rate independent smoothing toward a target transform.
//!
//! The camera, the yaw holder and inspected objects all chase a target
//! instead of snapping to it. They share the same `speed * dt` factor.

use bevy::prelude::*;

/// Blend factor for one frame of `speed`-per-second smoothing, capped at 1.
pub fn lerp_factor(speed: f32, dt: f32) -> f32 {
    (speed * dt).clamp(0.0, 1.0)
}

/// Component for smooth transform interpolation.
#[derive(Component, Debug, Clone)]
pub struct SmoothTransform {
    /// Target local translation (None = don't animate)
    pub target_translation: Option<Vec3>,
    /// Target local rotation (None = don't animate)
    pub target_rotation: Option<Quat>,
    pub translation_speed: f32,
    pub rotation_speed: f32,
}

impl Default for SmoothTransform {
    fn default() -> Self {
        Self {
            target_translation: None,
            target_rotation: None,
            translation_speed: 12.0,
            rotation_speed: 12.0,
        }
    }
}

impl SmoothTransform {
    pub fn new(translation_speed: f32, rotation_speed: f32) -> Self {
        Self {
            translation_speed,
            rotation_speed,
            ..default()
        }
    }

    /// Smooth rotation only, at `speed`.
    pub fn rotation_only(speed: f32, initial: Quat) -> Self {
        Self {
            target_rotation: Some(initial),
            rotation_speed: speed,
            ..default()
        }
    }
}

/// System that interpolates transforms toward their targets.
pub fn update_smooth_transforms(
    time: Res<Time>,
    mut query: Query<(&mut Transform, &SmoothTransform)>,
) {
    let dt = time.delta_secs();

    for (mut transform, smooth) in query.iter_mut() {
        if let Some(target) = smooth.target_translation {
            let t = lerp_factor(smooth.translation_speed, dt);
            transform.translation = transform.translation.lerp(target, t);
        }

        if let Some(target) = smooth.target_rotation {
            let t = lerp_factor(smooth.rotation_speed, dt);
            transform.rotation = transform.rotation.slerp(target, t);
        }
    }
}
