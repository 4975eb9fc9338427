//! Rope geometry: the wave drawn along a fresh rope, the cut collider
//! along a latched rope, and the plank laid between two static points.

use bevy::prelude::*;
use std::f32::consts::PI;

use super::config::GrappleConfig;

/// Half extent of the cut collider across the rope.
pub const ROPE_COLLIDER_HALF_WIDTH: f32 = 0.05;

/// Up and right vectors of a frame looking from `start` to `end`.
pub fn rope_frame(start: Vec3, end: Vec3) -> (Vec3, Vec3) {
    let direction = end - start;
    if direction.length_squared() < f32::EPSILON {
        return (Vec3::Y, Vec3::X);
    }
    let rotation = Transform::IDENTITY.looking_to(direction, Vec3::Y).rotation;
    (rotation * Vec3::Y, rotation * Vec3::X)
}

/// How strongly the wave shows at `delta` along the rope: zero at both
/// ends, full in the middle.
pub fn affect_curve(delta: f32) -> f32 {
    (delta * PI).sin()
}

/// Points of a rope from `start` to `end`.
///
/// With more than two points the rope is displaced sideways by a
/// corkscrew wave scaled by `spring_value`; with two it is a straight line.
pub fn rope_points(
    start: Vec3,
    end: Vec3,
    point_count: usize,
    spring_value: f32,
    config: &GrappleConfig,
) -> Vec<Vec3> {
    if point_count <= 2 {
        return vec![start, end];
    }

    let segments = (point_count - 1) as f32;
    let (up, right) = rope_frame(start, end);

    (0..point_count)
        .map(|t| {
            let delta = t as f32 / segments;
            let phase = delta * config.wave_count * PI;
            let amplitude = config.wave_height * spring_value * affect_curve(delta);
            let offset = up * (amplitude * phase.sin()) + right * (amplitude * phase.cos());
            start.lerp(end, delta) + offset
        })
        .collect()
}

/// Transform and length of a box lying along the segment `start`-`end`,
/// with its local Z axis pointing along the segment.
pub fn segment_box(start: Vec3, end: Vec3) -> (Transform, f32) {
    let length = start.distance(end);
    let mut transform = Transform::from_translation((start + end) * 0.5);
    if length > f32::EPSILON {
        transform.look_at(end, Vec3::Y);
    }
    (transform, length)
}
