//! Inspectable markers, inspection tuning and the current session.

use bevy::prelude::*;
use bevy_rapier3d::prelude::RigidBody;

/// Can be picked up and turned over with the inspect key.
#[derive(Component, Debug, Default)]
pub struct Inspectable;

/// Never becomes inspectable, even with the toggle key.
#[derive(Component, Debug, Default)]
pub struct InspectIgnore;

/// Inspection tuning.
#[derive(Resource, Debug, Clone)]
pub struct InspectConfig {
    /// Reach of the inspect ray
    pub max_pickup_distance: f32,
    /// How fast the object flies to the inspect point
    pub pickup_speed: f32,
    /// Degrees of rotation per pixel of mouse motion
    pub rotate_speed: f32,
    /// Inspect point travel per scroll line
    pub zoom_speed: f32,
    /// Closest the inspect point may come to the camera
    pub min_inspect_distance: f32,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            max_pickup_distance: 6.0,
            pickup_speed: 5.0,
            rotate_speed: 0.2,
            zoom_speed: 0.2,
            min_inspect_distance: 0.3,
        }
    }
}

/// Which crosshair the HUD should show.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AimIndicator {
    #[default]
    Dot,
    /// Looking at something inspectable
    Inspect,
    /// Inspecting, nothing drawn
    Hidden,
}

/// The object being inspected and everything needed to put it back.
#[derive(Debug, Clone)]
pub struct InspectSession {
    pub entity: Entity,
    pub origin: Transform,
    /// Body type before pickup, if the object has one
    pub body: Option<RigidBody>,
    /// Local position of the inspect point before any zooming
    pub original_distance: Vec3,
    /// Mouse motion accumulated since pickup
    pub rotation_input: Vec2,
}

impl InspectSession {
    pub fn new(entity: Entity, origin: Transform, body: Option<RigidBody>, inspect_point: Vec3) -> Self {
        Self {
            entity,
            origin,
            body,
            original_distance: inspect_point,
            rotation_input: Vec2::ZERO,
        }
    }

    /// Body type to use while the object is held.
    pub fn held_body(&self) -> Option<RigidBody> {
        self.body.map(|body| match body {
            RigidBody::Dynamic => RigidBody::KinematicPositionBased,
            other => other,
        })
    }

    /// Orientation of the held object for the accumulated mouse motion.
    ///
    /// Pushing the mouse up tips the object's top away from the camera.
    pub fn rotation(&self, rotate_speed: f32) -> Quat {
        let yaw = (self.rotation_input.x * rotate_speed).to_radians();
        let pitch = (self.rotation_input.y * rotate_speed).to_radians();
        Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0)
    }
}

/// Current inspection, if any.
#[derive(Resource, Debug, Default)]
pub struct InspectState {
    pub session: Option<InspectSession>,
}

/// Move the inspect point along the camera's depth axis for `scroll` lines.
///
/// Scrolling up pushes the object away. The point never comes closer than
/// `min_distance`.
pub fn zoom_inspect_point(local: Vec3, scroll: f32, zoom_speed: f32, min_distance: f32) -> Vec3 {
    let z = (local.z - scroll * zoom_speed).min(-min_distance);
    Vec3::new(local.x, local.y, z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dynamic_bodies_are_held_kinematic() {
        let session = InspectSession::new(Entity::from_raw(1), Transform::IDENTITY, Some(RigidBody::Dynamic), Vec3::NEG_Z);
        assert_eq!(session.held_body(), Some(RigidBody::KinematicPositionBased));

        let fixed = InspectSession { body: Some(RigidBody::Fixed), ..session.clone() };
        assert_eq!(fixed.held_body(), Some(RigidBody::Fixed));

        let loose = InspectSession { body: None, ..session };
        assert_eq!(loose.held_body(), None);
    }

    #[test]
    fn no_mouse_motion_keeps_the_object_upright() {
        let session = InspectSession::new(Entity::from_raw(1), Transform::IDENTITY, None, Vec3::NEG_Z);
        assert!(session.rotation(2.0).angle_between(Quat::IDENTITY) < 1e-5);
    }

    #[test]
    fn pushing_the_mouse_up_tips_the_top_away_from_the_viewer() {
        // Mouse motion is +Y downward; the camera looks down -Z
        let mut session = InspectSession::new(Entity::from_raw(1), Transform::IDENTITY, None, Vec3::NEG_Z);
        session.rotation_input = Vec2::new(0.0, -450.0);
        let rotation = session.rotation(0.2);

        assert!((rotation * Vec3::Y).distance(Vec3::NEG_Z) < 1e-4);
        assert!((rotation * Vec3::X).distance(Vec3::X) < 1e-4);
    }

    #[test]
    fn horizontal_motion_spins_around_up() {
        let mut session = InspectSession::new(Entity::from_raw(1), Transform::IDENTITY, None, Vec3::NEG_Z);
        session.rotation_input = Vec2::new(450.0, 0.0);
        let rotation = session.rotation(0.2);

        // 90 degrees about Y keeps Y fixed and turns X
        assert!((rotation * Vec3::Y).distance(Vec3::Y) < 1e-4);
        assert!((rotation * Vec3::X).distance(Vec3::NEG_Z) < 1e-4);
    }

    #[test]
    fn zoom_moves_along_depth_and_stops_at_the_camera() {
        let start = Vec3::new(0.0, 0.0, -1.2);
        let away = zoom_inspect_point(start, 1.0, 0.2, 0.3);
        assert!((away.z + 1.4).abs() < 1e-5);

        let near = zoom_inspect_point(start, -20.0, 0.2, 0.3);
        assert_eq!(near, Vec3::new(0.0, 0.0, -0.3));
    }
}
