//! Rigid-body player movement and the player entity hierarchy.
//!
//! The player is a dynamic body so rope joints can pull on it. Walking
//! writes horizontal velocity directly; in the air we only nudge it, which
//! keeps the momentum picked up while swinging.

use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};
use bevy_rapier3d::prelude::*;

use super::components::*;
use super::perspective::{mouse_look, PlayerCamera};
use crate::core::{Controls, GameState, PlayState, RopeType, SmoothTransform};
use crate::world::MovingPlatform;

/// Half height of the capsule's cylinder part.
const CAPSULE_HALF_HEIGHT: f32 = 0.5;
const CAPSULE_RADIUS: f32 = 0.3;

/// Set up player movement systems.
pub fn setup_movement_systems(app: &mut App) {
    app.add_systems(OnEnter(PlayState::Exploring), grab_cursor)
        .add_systems(OnExit(GameState::InGame), release_cursor)
        .add_systems(
            Update,
            (mouse_look, player_movement)
                .run_if(in_state(GameState::InGame))
                .run_if(in_state(PlayState::Exploring)),
        );
}

/// Grab and hide cursor whenever control returns to the player.
fn grab_cursor(mut window_query: Query<&mut Window, With<PrimaryWindow>>) {
    if let Ok(mut window) = window_query.get_single_mut() {
        window.cursor_options.grab_mode = CursorGrabMode::Locked;
        window.cursor_options.visible = false;
    }
}

/// Release cursor when leaving gameplay.
fn release_cursor(mut window_query: Query<&mut Window, With<PrimaryWindow>>) {
    if let Ok(mut window) = window_query.get_single_mut() {
        window.cursor_options.grab_mode = CursorGrabMode::None;
        window.cursor_options.visible = true;
    }
}

/// Turn held movement keys into a unit direction in the orientation's frame.
pub fn input_direction(keyboard: &ButtonInput<KeyCode>, controls: &Controls) -> Vec3 {
    let mut direction = Vec3::ZERO;
    if keyboard.pressed(controls.forward) {
        direction.z -= 1.0;
    }
    if keyboard.pressed(controls.back) {
        direction.z += 1.0;
    }
    if keyboard.pressed(controls.left) {
        direction.x -= 1.0;
    }
    if keyboard.pressed(controls.right) {
        direction.x += 1.0;
    }
    direction.normalize_or_zero()
}

/// New horizontal velocity for one frame of airborne steering.
///
/// Steering may bend the current velocity but never pushes horizontal
/// speed past whichever is larger: the walk speed or the speed we came in with.
pub fn air_steer(current: Vec3, wish: Vec3, speed: f32, acceleration: f32, dt: f32) -> Vec3 {
    let horizontal = Vec3::new(current.x, 0.0, current.z);
    let steered = horizontal + wish * acceleration * dt;
    let cap = horizontal.length().max(speed);
    steered.clamp_length_max(cap)
}

/// Horizontal velocity for walking at `wish * speed` on ground that is
/// itself moving at `carrier`.
pub fn grounded_velocity(wish: Vec3, speed: f32, carrier: Vec3) -> Vec3 {
    wish * speed + Vec3::new(carrier.x, 0.0, carrier.z)
}

/// Handle WASD movement and jumping.
pub fn player_movement(
    keyboard: Res<ButtonInput<KeyCode>>,
    controls: Res<Controls>,
    time: Res<Time>,
    config: Res<PlayerConfig>,
    rapier_context: Query<&RapierContext>,
    orientation_query: Query<&GlobalTransform, With<Orientation>>,
    platforms: Query<&MovingPlatform>,
    mut player_query: Query<(Entity, &Transform, &mut MovementState, &mut Velocity), With<Player>>,
) {
    let Ok((player_entity, transform, mut movement_state, mut velocity)) =
        player_query.get_single_mut()
    else {
        return;
    };
    let Ok(orientation) = orientation_query.get_single() else {
        return;
    };

    // Ground check: short ray from just above the bottom of the capsule
    let (is_grounded, ground) = if let Ok(context) = rapier_context.get_single() {
        let ray_origin = transform.translation - Vec3::Y * (CAPSULE_HALF_HEIGHT + CAPSULE_RADIUS - 0.05);
        let hit = context.cast_ray(
            ray_origin,
            Vec3::NEG_Y,
            config.ground_check_distance,
            true,
            QueryFilter::default()
                .exclude_sensors()
                .exclude_rigid_body(player_entity),
        );
        (hit.is_some(), hit.map(|(entity, _)| entity))
    } else {
        (true, None)
    };
    movement_state.is_grounded = is_grounded;

    // Only the yaw of the orientation matters for walking
    let yaw = orientation.compute_transform().rotation.to_euler(EulerRot::YXZ).0;
    let wish = Quat::from_rotation_y(yaw) * input_direction(&keyboard, &controls);

    let speed = if keyboard.pressed(controls.sprint) {
        config.move_speed * config.sprint_multiplier
    } else {
        config.move_speed
    };

    let horizontal = if is_grounded {
        // Stand still relative to a moving platform, not the world
        let carrier = ground
            .and_then(|entity| platforms.get(entity).ok())
            .map_or(Vec3::ZERO, |platform| platform.velocity);
        grounded_velocity(wish, speed, carrier)
    } else {
        air_steer(velocity.linvel, wish, speed, config.air_acceleration, time.delta_secs())
    };
    velocity.linvel.x = horizontal.x;
    velocity.linvel.z = horizontal.z;

    if is_grounded && keyboard.just_pressed(controls.jump) {
        velocity.linvel.y = config.jump_velocity;
    }
}

/// Spawn the player body with its orientation, camera and hand points.
pub fn spawn_player(commands: &mut Commands, position: Vec3, camera_config: &CameraConfig) -> Entity {
    let player = commands
        .spawn((
            Player,
            PlayerHitbox,
            Name::new("Player"),
            MovementState::default(),
            Transform::from_translation(position),
            Visibility::default(),
            RigidBody::Dynamic,
            Collider::capsule_y(CAPSULE_HALF_HEIGHT, CAPSULE_RADIUS),
            LockedAxes::ROTATION_LOCKED,
            Velocity::zero(),
            ExternalImpulse::default(),
            // No friction so the body slides along walls instead of sticking
            Friction {
                coefficient: 0.0,
                combine_rule: CoefficientCombineRule::Min,
            },
            Ccd::enabled(),
            Sleeping::disabled(),
            ActiveEvents::COLLISION_EVENTS,
        ))
        .id();

    commands.entity(player).with_children(|body| {
        body.spawn((
            Orientation,
            Transform::from_xyz(0.0, 0.4, 0.0),
            Visibility::default(),
            SmoothTransform::rotation_only(camera_config.smoothness, Quat::IDENTITY),
        ))
        .with_children(|orientation| {
            orientation
                .spawn((
                    Camera3d::default(),
                    Projection::Perspective(PerspectiveProjection {
                        fov: camera_config.fov.to_radians(),
                        ..default()
                    }),
                    PlayerCamera::default(),
                    SmoothTransform::rotation_only(camera_config.smoothness, Quat::IDENTITY),
                    Transform::default(),
                ))
                .with_children(|camera| {
                    camera.spawn((
                        HandSpawnPoint(RopeType::Left),
                        Transform::from_xyz(-0.35, -0.25, -0.4),
                        Visibility::default(),
                    ));
                    camera.spawn((
                        HandSpawnPoint(RopeType::Right),
                        Transform::from_xyz(0.35, -0.25, -0.4),
                        Visibility::default(),
                    ));
                    camera.spawn((
                        InspectPoint,
                        Transform::from_xyz(0.0, 0.0, -1.2),
                        Visibility::default(),
                    ));
                });
        });
    });

    info!("Spawned player at {}", position);
    player
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_input_is_normalized() {
        let controls = Controls::default();
        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(controls.forward);
        keyboard.press(controls.right);

        let direction = input_direction(&keyboard, &controls);
        assert!((direction.length() - 1.0).abs() < 1e-5);
        assert!(direction.x > 0.0 && direction.z < 0.0);
    }

    #[test]
    fn opposing_keys_cancel() {
        let controls = Controls::default();
        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(controls.left);
        keyboard.press(controls.right);

        assert_eq!(input_direction(&keyboard, &controls), Vec3::ZERO);
    }

    #[test]
    fn standing_on_a_platform_moves_with_it() {
        let carrier = Vec3::new(2.0, 0.5, -1.0);
        assert_eq!(grounded_velocity(Vec3::ZERO, 6.0, carrier), Vec3::new(2.0, 0.0, -1.0));
        assert_eq!(grounded_velocity(Vec3::X, 6.0, carrier), Vec3::new(8.0, 0.0, -1.0));
        assert_eq!(grounded_velocity(Vec3::NEG_Z, 6.0, Vec3::ZERO), Vec3::new(0.0, 0.0, -6.0));
    }

    #[test]
    fn grounded_player_is_carried_by_the_platform_under_them() {
        use crate::testing::physics_app;
        use crate::world::PlatformEase;

        let mut app = physics_app();
        app.init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<Controls>()
            .init_resource::<PlayerConfig>()
            .add_systems(Update, player_movement);

        // Platform top face at y = 0
        let center = Vec3::new(0.0, -0.2, 0.0);
        let mut platform = MovingPlatform::new(center, Vec3::new(0.0, 0.0, -5.0), 5.0, PlatformEase::Linear, 1.0);
        platform.velocity = Vec3::new(0.0, 0.0, -1.0);
        let world = app.world_mut();
        world.spawn((
            platform,
            Transform::from_translation(center),
            RigidBody::KinematicPositionBased,
            Collider::cuboid(2.0, 0.2, 2.0),
        ));
        world.spawn((Orientation, Transform::default()));
        // Capsule bottom resting on the platform top
        let player = world
            .spawn((
                Player,
                MovementState::default(),
                Transform::from_xyz(0.0, CAPSULE_HALF_HEIGHT + CAPSULE_RADIUS, 0.0),
                Velocity::zero(),
            ))
            .id();

        app.update();
        app.update();

        let world = app.world();
        assert!(world.get::<MovementState>(player).unwrap().is_grounded);
        let velocity = world.get::<Velocity>(player).unwrap();
        assert!(velocity.linvel.distance(Vec3::NEG_Z) < 1e-4, "{}", velocity.linvel);
    }

    #[test]
    fn air_steer_keeps_swing_momentum() {
        let fast = Vec3::new(20.0, -3.0, 0.0);
        let steered = air_steer(fast, Vec3::X, 6.0, 8.0, 0.1);
        assert!((steered.length() - 20.0).abs() < 1e-4);
        assert_eq!(steered.y, 0.0);
    }

    #[test]
    fn air_steer_accelerates_up_to_walk_speed() {
        let mut velocity = Vec3::ZERO;
        for _ in 0..100 {
            velocity = air_steer(velocity, Vec3::NEG_Z, 6.0, 8.0, 0.1);
        }
        assert!((velocity.length() - 6.0).abs() < 1e-4);
    }
}
