//! First-person perspective: mouse look, look tilt and smoothing.

use bevy::input::mouse::MouseMotion;
use bevy::math::FloatExt;
use bevy::prelude::*;

use super::components::*;
use crate::core::{lerp_factor, SmoothTransform};

/// Accumulated look angles for the player's camera, in degrees.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct PlayerCamera {
    pub yaw: f32,
    pub pitch: f32,
    /// Current roll from look tilt
    pub tilt: f32,
}

impl PlayerCamera {
    /// Add one frame of mouse motion, in raw pixels.
    pub fn apply_mouse(&mut self, delta: Vec2, config: &CameraConfig) {
        self.yaw -= delta.x * config.sensitivity_x * config.multiplier;
        self.pitch -= delta.y * config.sensitivity_y * config.multiplier;
        self.pitch = self.pitch.clamp(config.min_pitch, config.max_pitch);
    }

    /// Lean into horizontal mouse motion, or settle back to level.
    pub fn update_tilt(&mut self, mouse_x: f32, dt: f32, config: &CameraConfig) {
        if mouse_x != 0.0 {
            let input = (mouse_x * config.tilt_input_scale).clamp(-1.0, 1.0);
            let target = -input * config.look_tilt_amount;
            self.tilt = self.tilt.lerp(target, lerp_factor(config.look_tilt_speed, dt));
        } else {
            self.tilt = self.tilt.lerp(0.0, lerp_factor(config.tilt_reset_speed, dt));
        }
    }

    /// Local rotation of the camera under the yaw holder.
    pub fn camera_rotation(&self) -> Quat {
        Quat::from_rotation_x(self.pitch.to_radians()) * Quat::from_rotation_z(self.tilt.to_radians())
    }

    /// Rotation of the yaw holder.
    pub fn orientation_rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw.to_radians())
    }
}

/// Read mouse motion and update the camera and orientation targets.
///
/// Only scheduled while exploring, so inspecting or browsing the
/// scratchpad leaves the view where it was.
pub fn mouse_look(
    mut mouse_motion: EventReader<MouseMotion>,
    time: Res<Time>,
    config: Res<CameraConfig>,
    mut camera_query: Query<(&mut PlayerCamera, &mut SmoothTransform)>,
    mut orientation_query: Query<&mut SmoothTransform, (With<Orientation>, Without<PlayerCamera>)>,
) {
    let delta: Vec2 = mouse_motion.read().map(|event| event.delta).sum();

    let Ok((mut camera, mut camera_smooth)) = camera_query.get_single_mut() else {
        return;
    };
    let Ok(mut orientation_smooth) = orientation_query.get_single_mut() else {
        return;
    };

    camera.apply_mouse(delta, &config);
    camera.update_tilt(delta.x, time.delta_secs(), &config);

    camera_smooth.rotation_speed = config.smoothness;
    camera_smooth.target_rotation = Some(camera.camera_rotation());
    orientation_smooth.rotation_speed = config.smoothness;
    orientation_smooth.target_rotation = Some(camera.orientation_rotation());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pitch_is_clamped() {
        let config = CameraConfig::default();
        let mut camera = PlayerCamera::default();

        camera.apply_mouse(Vec2::new(0.0, -100_000.0), &config);
        assert_eq!(camera.pitch, config.max_pitch);

        camera.apply_mouse(Vec2::new(0.0, 100_000.0), &config);
        assert_eq!(camera.pitch, config.min_pitch);
    }

    #[test]
    fn moving_mouse_right_turns_right() {
        let config = CameraConfig::default();
        let mut camera = PlayerCamera::default();
        camera.apply_mouse(Vec2::new(100.0, 0.0), &config);

        let forward = camera.orientation_rotation() * Vec3::NEG_Z;
        assert!(forward.x > 0.0, "forward should swing toward +X, got {forward:?}");
    }

    #[test]
    fn tilt_leans_then_recovers() {
        let config = CameraConfig::default();
        let mut camera = PlayerCamera::default();

        for _ in 0..30 {
            camera.update_tilt(50.0, 1.0 / 60.0, &config);
        }
        assert!(camera.tilt < 0.0);
        assert!(camera.tilt >= -config.look_tilt_amount);

        for _ in 0..600 {
            camera.update_tilt(0.0, 1.0 / 60.0, &config);
        }
        assert!(camera.tilt.abs() < 1e-3);
    }
}
