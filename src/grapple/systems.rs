//! Grapple systems: hook input, firing and latching, retracting, cutting
//! and drawing ropes.
//!
//! Physics is entirely Rapier's. A swinging player hangs from a rope joint
//! to a fixed hook anchor; a latched rope that caught a dynamic body holds
//! it with a rope joint on the hook anchor, anchored at the latch point in
//! the body's local space.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::components::*;
use super::config::GrappleConfig;
use super::rope::{rope_points, segment_box, ROPE_COLLIDER_HALF_WIDTH};
use super::spring::Spring;
use crate::core::{Controls, DestroyRopesEvent, PlaySoundEvent, RopeType, Sfx};
use crate::player::{HandSpawnPoint, Player, PlayerCamera};
use crate::world::LevelEntity;

/// Gizmo group for ropes the player is hanging from.
#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct SwingRopeGizmos;

/// Gizmo group for latched ropes, drawn thicker.
#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct LatchedRopeGizmos;

/// Screen pixels per world unit of configured rope thickness.
const THICKNESS_TO_PIXELS: f32 = 100.0;

/// Meshes and materials shared by every rope.
#[derive(Resource)]
pub struct GrappleAssets {
    pub hook_mesh: Handle<Mesh>,
    pub hook_material: Handle<StandardMaterial>,
    pub plank_material: Handle<StandardMaterial>,
}

/// The body a ray hit, if the collider belongs to one.
#[derive(Debug, Clone, Copy)]
struct HitBody {
    entity: Entity,
    dynamic: bool,
    transform: GlobalTransform,
}

impl HitBody {
    fn local_point(&self, world: Vec3) -> Vec3 {
        self.transform.affine().inverse().transform_point3(world)
    }
}

pub fn setup_grapple_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<GrappleConfig>,
    mut config_store: ResMut<GizmoConfigStore>,
) {
    commands.insert_resource(GrappleAssets {
        hook_mesh: meshes.add(Sphere::new(0.08)),
        hook_material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.2, 0.2, 0.22),
            metallic: 0.8,
            perceptual_roughness: 0.3,
            ..default()
        }),
        plank_material: materials.add(Color::srgb(0.45, 0.32, 0.2)),
    });

    let (swing, _) = config_store.config_mut::<SwingRopeGizmos>();
    swing.line_width = (config.start_thickness * THICKNESS_TO_PIXELS).max(1.0);
    let (latched, _) = config_store.config_mut::<LatchedRopeGizmos>();
    latched.line_width = (config.end_thickness * THICKNESS_TO_PIXELS).max(1.0);
}

pub fn init_grapple_state(mut commands: Commands, config: Res<GrappleConfig>) {
    commands.insert_resource(GrappleState::new(Spring::new(config.damper, config.spring_strength)));
}

/// Forget every rope. The entities are owned by the level and despawn with it.
pub fn reset_grapple_state(mut state: ResMut<GrappleState>) {
    let spring = state.spring;
    *state = GrappleState::new(spring);
    state.spring.reset();
}

fn hook_model(assets: &GrappleAssets) -> impl Bundle {
    (
        HookModel,
        Mesh3d(assets.hook_mesh.clone()),
        MeshMaterial3d(assets.hook_material.clone()),
        Transform::default(),
    )
}

/// Walk up from a hit collider to the rigid body that owns it.
fn find_body(
    entity: Entity,
    bodies: &Query<(&RigidBody, &GlobalTransform)>,
    parents: &Query<&Parent>,
) -> Option<HitBody> {
    let mut current = entity;
    loop {
        if let Ok((body, transform)) = bodies.get(current) {
            return Some(HitBody {
                entity: current,
                dynamic: *body == RigidBody::Dynamic,
                transform: *transform,
            });
        }
        current = parents.get(current).ok()?.get();
    }
}

fn swing_joint(rope: &Rope, config: &GrappleConfig) -> RopeJointBuilder {
    let joint = RopeJointBuilder::new(rope.max_distance);
    if rope.retracting {
        joint.motor_position(rope.min_distance, config.player_retract_strength, config.retract_damping)
    } else {
        joint
    }
}

fn tether_joint(rope: &Rope, tether: Tether, config: &GrappleConfig) -> RopeJointBuilder {
    let joint = RopeJointBuilder::new(rope.max_distance).local_anchor1(tether.local_anchor);
    if rope.retracting {
        joint.motor_position(0.0, config.retract_strength, config.retract_damping)
    } else {
        joint
    }
}

fn despawn_rope(commands: &mut Commands, rope: &Rope) {
    for entity in rope.owned_entities() {
        if let Some(entity_commands) = commands.get_entity(entity) {
            entity_commands.despawn_recursive();
        }
    }
}

/// Despawn `ropes`, detaching the player if one of them was the swing rope.
fn drop_ropes(commands: &mut Commands, player: Option<Entity>, ropes: &[Rope]) {
    if ropes.iter().any(|rope| rope.phase == RopePhase::Swing) {
        if let Some(player) = player {
            commands.entity(player).remove::<ImpulseJoint>();
        }
    }
    for rope in ropes {
        despawn_rope(commands, rope);
    }
}

/// Hold-to-swing input shared by both hook buttons.
pub fn hook_input(
    mouse: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    controls: Res<Controls>,
    time: Res<Time>,
    config: Res<GrappleConfig>,
    mut state: ResMut<GrappleState>,
    mut player_query: Query<(&Velocity, &mut ExternalImpulse), With<Player>>,
) {
    if keyboard.pressed(controls.hook_modifier) {
        return;
    }

    let buttons = [controls.hook_left, controls.hook_right];
    if mouse.any_just_pressed(buttons) {
        state.press();
    }
    if mouse.any_pressed(buttons) {
        state.hold(time.delta_secs(), config.hold_delay_to_swing);
    }
    if mouse.any_just_released(buttons) && state.release(config.hold_delay_to_swing) {
        // Fling the player along their current heading
        if let Ok((velocity, mut impulse)) = player_query.get_single_mut() {
            impulse.impulse += velocity.linvel * config.release_impulse_factor;
        }
    }
}

/// First click fires a hook, a click while hooked latches the rope.
#[allow(clippy::too_many_arguments)]
pub fn fire_hooks(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mouse: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    controls: Res<Controls>,
    config: Res<GrappleConfig>,
    assets: Res<GrappleAssets>,
    mut state: ResMut<GrappleState>,
    rapier_context: Query<&RapierContext>,
    camera_query: Query<&GlobalTransform, With<PlayerCamera>>,
    hand_query: Query<(Entity, &HandSpawnPoint)>,
    player_query: Query<(Entity, &GlobalTransform), With<Player>>,
    bodies: Query<(&RigidBody, &GlobalTransform)>,
    parents: Query<&Parent>,
    mut sounds: EventWriter<PlaySoundEvent>,
) {
    if keyboard.pressed(controls.hook_modifier) {
        return;
    }
    let Ok(context) = rapier_context.get_single() else {
        return;
    };
    let Ok(camera) = camera_query.get_single() else {
        return;
    };
    let Ok((player, player_transform)) = player_query.get_single() else {
        return;
    };

    let origin = camera.translation();
    let direction = camera.forward().as_vec3();
    let filter = QueryFilter::default()
        .exclude_sensors()
        .exclude_rigid_body(player);

    for (button, hand) in [
        (controls.hook_left, RopeType::Left),
        (controls.hook_right, RopeType::Right),
    ] {
        if !mouse.just_pressed(button) {
            continue;
        }

        // The first hook has limited range; a latch can reach anything in view
        let range = if state.hooked { f32::MAX } else { config.hook_distance };
        let Some((hit_entity, toi)) = context.cast_ray(origin, direction, range, true, filter) else {
            continue;
        };
        let point = origin + direction * toi;
        let hit_body = find_body(hit_entity, &bodies, &parents);

        if state.hooked {
            create_latch(
                &mut commands,
                &mut meshes,
                &mut state,
                &config,
                &assets,
                player,
                point,
                direction,
                hit_body,
                &mut sounds,
            );
        } else {
            let Some((hand_point, _)) = hand_query.iter().find(|(_, spawn)| spawn.0 == hand) else {
                warn!("No hand spawn point for {:?}", hand);
                continue;
            };
            create_hook(
                &mut commands,
                &mut state,
                &config,
                &assets,
                hand,
                hand_point,
                (player, player_transform.translation()),
                point,
                direction,
                hit_body,
                &mut sounds,
            );
        }
        // One shot per frame, even with both buttons down
        break;
    }
}

#[allow(clippy::too_many_arguments)]
fn create_hook(
    commands: &mut Commands,
    state: &mut GrappleState,
    config: &GrappleConfig,
    assets: &GrappleAssets,
    hand: RopeType,
    hand_point: Entity,
    (player, player_position): (Entity, Vec3),
    point: Vec3,
    direction: Vec3,
    hit_body: Option<HitBody>,
    sounds: &mut EventWriter<PlaySoundEvent>,
) {
    let hook = commands
        .spawn((
            HookAnchor,
            LevelEntity,
            Name::new("Hook"),
            Transform::from_translation(point),
            Visibility::default(),
            RigidBody::Fixed,
        ))
        .with_children(|anchor| {
            anchor.spawn(hook_model(assets));
        })
        .id();

    let hand_model = commands.spawn(hook_model(assets)).set_parent(hand_point).id();

    // Cut collider stays disabled until the rope is latched
    let collider = commands
        .spawn((
            RopeCollider::default(),
            LevelEntity,
            Name::new("RopeCollider"),
            Transform::from_translation(point),
            Collider::cuboid(ROPE_COLLIDER_HALF_WIDTH, ROPE_COLLIDER_HALF_WIDTH, ROPE_COLLIDER_HALF_WIDTH),
            Sensor,
            ColliderDisabled,
        ))
        .id();

    let distance = player_position.distance(point);
    let (min_distance, max_distance) = swing_limits(hand, distance, config.right_rope_slack);

    let rope = Rope {
        hand,
        phase: RopePhase::Swing,
        hook,
        hook_point: point,
        hand_model: Some(hand_model),
        latch: None,
        collider,
        plank: None,
        tether: None,
        points: config.segments + 1,
        min_distance,
        max_distance,
        retracting: false,
    };

    commands
        .entity(player)
        .insert(ImpulseJoint::new(hook, swing_joint(&rope, config)));

    // Knock whatever we hit
    if let Some(body) = hit_body.filter(|body| body.dynamic) {
        commands.entity(body.entity).insert(ExternalImpulse {
            impulse: direction * config.latch_on_impulse * 0.2,
            ..default()
        });
    }

    state.spring.reset();
    state.spring.set_velocity(config.speed);
    state.push_rope(rope);

    sounds.send(PlaySoundEvent(Sfx::Grapple));
    info!("{:?} hook attached at {} ({:.1}m)", hand, point, distance);
}

#[allow(clippy::too_many_arguments)]
fn create_latch(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    state: &mut GrappleState,
    config: &GrappleConfig,
    assets: &GrappleAssets,
    player: Entity,
    point: Vec3,
    direction: Vec3,
    hit_body: Option<HitBody>,
    sounds: &mut EventWriter<PlaySoundEvent>,
) {
    if state.swing_rope().is_none() {
        state.hooked = false;
        return;
    }
    let index = state.ropes.len() - 1;
    let dynamic_body = hit_body.filter(|body| body.dynamic);

    // A latch on a moving body rides along with it
    let latch = match dynamic_body {
        Some(body) => commands
            .spawn((
                LatchAnchor,
                Name::new("HookLatch"),
                Transform::from_translation(body.local_point(point)),
                Visibility::default(),
            ))
            .set_parent(body.entity)
            .id(),
        None => commands
            .spawn((
                LatchAnchor,
                LevelEntity,
                Name::new("HookLatch"),
                Transform::from_translation(point),
                Visibility::default(),
            ))
            .id(),
    };
    commands.entity(latch).with_children(|anchor| {
        anchor.spawn(hook_model(assets));
    });

    commands.entity(player).remove::<ImpulseJoint>();

    let rope = &mut state.ropes[index];
    if let Some(hand_model) = rope.hand_model.take() {
        commands.entity(hand_model).despawn_recursive();
    }
    rope.latch = Some(latch);
    rope.phase = RopePhase::Latched;
    rope.retracting = false;
    commands.entity(rope.collider).remove::<ColliderDisabled>();
    let hook_point = rope.hook_point;
    let length = hook_point.distance(point);

    state.spring.reset();
    state.spring.set_velocity(config.speed);
    state.optimize_timer = Some(config.optimize_delay);
    state.hooked = false;

    if length < config.minimum_rope_length {
        if let Some(rope) = state.remove_last() {
            despawn_rope(commands, &rope);
        }
        sounds.send(PlaySoundEvent(Sfx::Release));
        info!("Rope too short ({:.2}m), released", length);
        return;
    }

    sounds.send(PlaySoundEvent(Sfx::Grapple));

    let rope = &mut state.ropes[index];
    match dynamic_body {
        Some(body) => {
            let tether = Tether {
                body: body.entity,
                local_anchor: body.local_point(point),
            };
            rope.tether = Some(tether);
            rope.min_distance = 0.0;
            rope.max_distance = length;
            commands
                .entity(rope.hook)
                .insert(ImpulseJoint::new(body.entity, tether_joint(rope, tether, config)));
            commands.entity(body.entity).insert(ExternalImpulse {
                impulse: direction * config.latch_on_impulse * 0.2,
                ..default()
            });
            info!("Rope latched to body {:?} ({:.1}m)", body.entity, length);
        }
        None => {
            let (transform, length) = segment_box(hook_point, point);
            let plank = commands
                .spawn((
                    RopePlank,
                    LevelEntity,
                    Name::new("RopePlank"),
                    Mesh3d(meshes.add(Cuboid::new(config.plank_width, config.plank_thickness, length))),
                    MeshMaterial3d(assets.plank_material.clone()),
                    transform,
                    RigidBody::Fixed,
                    Collider::cuboid(config.plank_width / 2.0, config.plank_thickness / 2.0, length / 2.0),
                ))
                .id();
            rope.plank = Some(plank);
            info!("Rope latched at {} with a {:.1}m plank", point, length);
        }
    }
}

/// Middle click reels every rope in.
pub fn retract_ropes(
    mut commands: Commands,
    mouse: Res<ButtonInput<MouseButton>>,
    controls: Res<Controls>,
    config: Res<GrappleConfig>,
    mut state: ResMut<GrappleState>,
    player_query: Query<Entity, With<Player>>,
    mut sounds: EventWriter<PlaySoundEvent>,
) {
    if !mouse.just_pressed(controls.retract) {
        return;
    }
    let Ok(player) = player_query.get_single() else {
        return;
    };

    for rope in state.ropes.iter_mut() {
        rope.retracting = true;
        match (rope.phase, rope.tether) {
            (RopePhase::Swing, _) => {
                commands
                    .entity(player)
                    .insert(ImpulseJoint::new(rope.hook, swing_joint(rope, &config)));
            }
            (RopePhase::Latched, Some(tether)) => {
                if let Some(mut hook) = commands.get_entity(rope.hook) {
                    hook.insert(ImpulseJoint::new(tether.body, tether_joint(rope, tether, &config)));
                }
            }
            (RopePhase::Latched, None) => {}
        }
    }

    if !state.ropes.is_empty() {
        sounds.send(PlaySoundEvent(Sfx::Retract));
    }
}

/// Drop the swing rope on release, cut ropes under the crosshair, or
/// clear everything.
#[allow(clippy::too_many_arguments)]
pub fn cut_ropes(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    controls: Res<Controls>,
    mut state: ResMut<GrappleState>,
    rapier_context: Query<&RapierContext>,
    camera_query: Query<&GlobalTransform, With<PlayerCamera>>,
    player_query: Query<Entity, With<Player>>,
    rope_colliders: Query<(), With<RopeCollider>>,
    mut sounds: EventWriter<PlaySoundEvent>,
) {
    let player = player_query.get_single().ok();

    if state.take_release() {
        destroy_last_hook(&mut commands, &mut state, player, &mut sounds);
    }

    if keyboard.pressed(controls.cut_rope) {
        if state.hooked {
            destroy_last_hook(&mut commands, &mut state, player, &mut sounds);
        } else if let (Ok(context), Ok(camera)) = (rapier_context.get_single(), camera_query.get_single()) {
            let is_rope = |entity: Entity| rope_colliders.contains(entity);
            let filter = QueryFilter::default().predicate(&is_rope);
            let hit = context.cast_ray(camera.translation(), camera.forward().as_vec3(), f32::MAX, true, filter);

            if let Some(index) = hit.and_then(|(entity, _)| state.index_of_collider(entity)) {
                if let Some(rope) = state.remove(index) {
                    drop_ropes(&mut commands, player, std::slice::from_ref(&rope));
                    sounds.send(PlaySoundEvent(Sfx::Release));
                    info!("Cut rope {}", index);
                }
            }
        }
    }

    if keyboard.just_pressed(controls.reset_hooks) {
        let ropes = state.drain_matching(None);
        drop_ropes(&mut commands, player, &ropes);
        sounds.send(PlaySoundEvent(Sfx::Release));
        info!("Reset hooks, removed {} ropes", ropes.len());
    }
}

fn destroy_last_hook(
    commands: &mut Commands,
    state: &mut GrappleState,
    player: Option<Entity>,
    sounds: &mut EventWriter<PlaySoundEvent>,
) {
    if let Some(player) = player {
        commands.entity(player).remove::<ImpulseJoint>();
    }
    if let Some(rope) = state.remove_last() {
        despawn_rope(commands, &rope);
    }
    sounds.send(PlaySoundEvent(Sfx::Release));
}

/// Cut ropes on request from elsewhere (volumes, respawn).
pub fn handle_destroy_ropes(
    mut commands: Commands,
    mut events: EventReader<DestroyRopesEvent>,
    mut state: ResMut<GrappleState>,
    player_query: Query<Entity, With<Player>>,
    mut sounds: EventWriter<PlaySoundEvent>,
) {
    let player = player_query.get_single().ok();

    for DestroyRopesEvent(rope_type) in events.read() {
        let ropes = state.drain_matching(*rope_type);
        if ropes.is_empty() {
            continue;
        }
        drop_ropes(&mut commands, player, &ropes);
        sounds.send(PlaySoundEvent(Sfx::Release));
        info!("Destroyed {} ropes ({:?})", ropes.len(), rope_type.unwrap_or_default());
    }
}

pub fn tick_rope_optimizer(time: Res<Time>, mut state: ResMut<GrappleState>) {
    if state.tick_optimizer(time.delta_secs()) {
        debug!("Latched ropes straightened");
    }
}

/// Draw every rope and keep cut colliders lined up with latched ropes.
///
/// Runs after transform propagation so rope ends follow their anchors on
/// the same frame.
#[allow(clippy::too_many_arguments)]
pub fn draw_ropes(
    time: Res<Time>,
    config: Res<GrappleConfig>,
    mut state: ResMut<GrappleState>,
    transforms: Query<&GlobalTransform>,
    hands: Query<(&GlobalTransform, &HandSpawnPoint)>,
    mut colliders: Query<(&mut Transform, &mut Collider, &mut RopeCollider)>,
    mut swing_gizmos: Gizmos<SwingRopeGizmos>,
    mut latched_gizmos: Gizmos<LatchedRopeGizmos>,
) {
    if state.ropes.is_empty() {
        return;
    }

    let last = state.ropes.len() - 1;
    let animating = state
        .ropes
        .iter()
        .enumerate()
        .any(|(i, rope)| rope.points > 2 && (rope.phase == RopePhase::Swing || i == last));
    if animating {
        state.spring.set_damper(config.damper);
        state.spring.set_strength(config.spring_strength);
        state.spring.update(time.delta_secs());
    }
    let spring_value = state.spring.value();

    let position = |entity: Option<Entity>| entity.and_then(|e| transforms.get(e).ok()).map(|t| t.translation());

    for (i, rope) in state.ropes.iter().enumerate() {
        let color = config.rope_color(rope.hand == RopeType::Right);
        let hook = position(Some(rope.hook)).unwrap_or(rope.hook_point);

        match rope.phase {
            RopePhase::Swing => {
                let Some((hand, _)) = hands.iter().find(|(_, spawn)| spawn.0 == rope.hand) else {
                    continue;
                };
                let points = rope_points(hand.translation(), hook, rope.points, spring_value, &config);
                swing_gizmos.linestrip(points, color);
            }
            RopePhase::Latched => {
                let Some(latch) = position(rope.latch) else {
                    continue;
                };
                let point_count = if i == last { rope.points } else { 2 };
                let points = rope_points(latch, hook, point_count, spring_value, &config);
                latched_gizmos.linestrip(points, color);

                if let Ok((mut transform, mut collider, mut rope_collider)) = colliders.get_mut(rope.collider) {
                    let (segment, length) = segment_box(hook, latch);
                    *transform = segment;
                    if (length - rope_collider.length).abs() > 0.01 {
                        *collider = Collider::cuboid(
                            ROPE_COLLIDER_HALF_WIDTH,
                            ROPE_COLLIDER_HALF_WIDTH,
                            (length / 2.0).max(ROPE_COLLIDER_HALF_WIDTH),
                        );
                        rope_collider.length = length;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn latched_rope(world: &mut World, hand: RopeType) -> Rope {
        let hook = world.spawn(HookAnchor).id();
        let latch = world.spawn(LatchAnchor).id();
        let collider = world.spawn(RopeCollider::default()).id();
        Rope {
            hand,
            phase: RopePhase::Latched,
            hook,
            hook_point: Vec3::ZERO,
            hand_model: None,
            latch: Some(latch),
            collider,
            plank: None,
            tether: None,
            points: 2,
            min_distance: 0.0,
            max_distance: 5.0,
            retracting: false,
        }
    }

    fn test_app() -> App {
        let mut app = App::new();
        app.add_event::<DestroyRopesEvent>()
            .add_event::<PlaySoundEvent>()
            .init_resource::<GrappleState>()
            .add_systems(Update, handle_destroy_ropes);
        app
    }

    #[test]
    fn destroy_event_despawns_matching_ropes_and_detaches_player() {
        let mut app = test_app();
        let world = app.world_mut();

        let left = latched_rope(world, RopeType::Left);
        let right = latched_rope(world, RopeType::Right);
        let mut swing = latched_rope(world, RopeType::Left);
        swing.phase = RopePhase::Swing;
        let player = world.spawn((Player, ImpulseJoint::new(swing.hook, RopeJointBuilder::new(5.0)))).id();

        {
            let mut state = world.resource_mut::<GrappleState>();
            state.ropes = vec![left.clone(), right.clone(), swing.clone()];
            state.hooked = true;
        }

        world.send_event(DestroyRopesEvent(Some(RopeType::Left)));
        app.update();

        let world = app.world();
        for entity in left.owned_entities().chain(swing.owned_entities()) {
            assert!(!world.entities().contains(entity), "{entity:?} should be despawned");
        }
        for entity in right.owned_entities() {
            assert!(world.entities().contains(entity));
        }
        assert!(world.get::<ImpulseJoint>(player).is_none());

        let state = world.resource::<GrappleState>();
        assert_eq!(state.ropes.len(), 1);
        assert!(!state.hooked);

        let sounds = world.resource::<Events<PlaySoundEvent>>();
        assert_eq!(sounds.len(), 1);
    }

    #[test]
    fn destroy_event_with_no_ropes_is_silent() {
        let mut app = test_app();
        app.world_mut().send_event(DestroyRopesEvent(None));
        app.update();

        assert!(app.world().resource::<Events<PlaySoundEvent>>().is_empty());
    }

    #[test]
    fn optimizer_system_counts_down_with_time() {
        use std::time::Duration;

        let mut app = App::new();
        app.init_resource::<Time>()
            .init_resource::<GrappleState>()
            .add_systems(Update, tick_rope_optimizer);

        let rope = latched_rope(app.world_mut(), RopeType::Right);
        {
            let mut state = app.world_mut().resource_mut::<GrappleState>();
            state.ropes.push(Rope { points: 51, ..rope });
            state.optimize_timer = Some(0.5);
        }

        app.world_mut().resource_mut::<Time>().advance_by(Duration::from_millis(600));
        app.update();

        let state = app.world().resource::<GrappleState>();
        assert!(state.optimize_timer.is_none());
        assert_eq!(state.ropes[0].points, 2);
    }

    mod physics {
        use super::*;
        use crate::testing::physics_app;
        use bevy_rapier3d::rapier::dynamics::JointAxis;

        /// The wall in front of the player is this far down -Z.
        const WALL_DISTANCE: f32 = 10.0;
        /// Second targets sit this far down +X.
        const SIDE_DISTANCE: f32 = 10.0;

        struct Rig {
            app: App,
            player: Entity,
            camera: Entity,
        }

        fn rig(config: GrappleConfig) -> Rig {
            let mut app = physics_app();
            app.add_event::<PlaySoundEvent>()
                .add_event::<DestroyRopesEvent>()
                .init_resource::<ButtonInput<MouseButton>>()
                .init_resource::<ButtonInput<KeyCode>>()
                .init_resource::<Controls>()
                .insert_resource(GrappleState::new(Spring::new(config.damper, config.spring_strength)))
                .insert_resource(GrappleAssets {
                    hook_mesh: Handle::default(),
                    hook_material: Handle::default(),
                    plank_material: Handle::default(),
                })
                .insert_resource(config)
                .add_systems(Update, (hook_input, fire_hooks, retract_ropes, cut_ropes).chain());

            let world = app.world_mut();
            world.spawn((
                Transform::from_xyz(0.0, 0.0, -WALL_DISTANCE - 0.5),
                RigidBody::Fixed,
                Collider::cuboid(5.0, 5.0, 0.5),
            ));
            let player = world
                .spawn((
                    Player,
                    Transform::default(),
                    RigidBody::Dynamic,
                    GravityScale(0.0),
                    Collider::ball(0.3),
                    Velocity::zero(),
                    ExternalImpulse::default(),
                ))
                .id();
            let camera = world.spawn((PlayerCamera::default(), Transform::default())).id();
            world.spawn((HandSpawnPoint(RopeType::Left), Transform::from_xyz(-0.3, -0.2, 0.0)));
            world.spawn((HandSpawnPoint(RopeType::Right), Transform::from_xyz(0.3, -0.2, 0.0)));

            app.update();
            Rig { app, player, camera }
        }

        impl Rig {
            fn press(&mut self, buttons: &[MouseButton]) {
                {
                    let mut mouse = self.app.world_mut().resource_mut::<ButtonInput<MouseButton>>();
                    for &button in buttons {
                        mouse.press(button);
                    }
                }
                self.app.update();
                let mut mouse = self.app.world_mut().resource_mut::<ButtonInput<MouseButton>>();
                mouse.release_all();
                mouse.clear();
            }

            fn click(&mut self, button: MouseButton) {
                self.press(&[button]);
            }

            fn tap_key(&mut self, key: KeyCode) {
                self.app.world_mut().resource_mut::<ButtonInput<KeyCode>>().press(key);
                self.app.update();
                let mut keyboard = self.app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
                keyboard.release_all();
                keyboard.clear();
            }

            /// Turn the camera; the next frame sees the new aim.
            fn look(&mut self, direction: Vec3) {
                self.app
                    .world_mut()
                    .entity_mut(self.camera)
                    .insert(Transform::default().looking_to(direction, Vec3::Y));
                self.app.update();
            }

            /// A box whose near face is `SIDE_DISTANCE` down +X.
            fn spawn_side_target(&mut self, body: RigidBody) -> Entity {
                self.app
                    .world_mut()
                    .spawn((
                        Transform::from_xyz(SIDE_DISTANCE + 0.5, 0.0, 0.0),
                        body,
                        GravityScale(0.0),
                        Collider::cuboid(0.5, 0.5, 0.5),
                    ))
                    .id()
            }

            fn state(&self) -> &GrappleState {
                self.app.world().resource::<GrappleState>()
            }

            fn sounds(&self) -> Vec<Sfx> {
                self.app
                    .world()
                    .resource::<Events<PlaySoundEvent>>()
                    .iter_current_update_events()
                    .map(|event| event.0)
                    .collect()
            }

            fn rope_joint(&self, entity: Entity) -> (Entity, RopeJoint) {
                let joint = self
                    .app
                    .world()
                    .get::<ImpulseJoint>(entity)
                    .expect("entity should carry a joint");
                match joint.data {
                    TypedJoint::RopeJoint(rope) => (joint.parent, rope),
                    other => panic!("expected a rope joint, got {other:?}"),
                }
            }
        }

        fn wall_point() -> Vec3 {
            Vec3::new(0.0, 0.0, -WALL_DISTANCE)
        }

        #[test]
        fn left_hook_holds_the_player_at_the_hooked_distance() {
            let config = GrappleConfig::default();
            let speed = config.speed;
            let mut rig = rig(config);
            rig.click(MouseButton::Left);

            let state = rig.state();
            assert!(state.hooked);
            assert_eq!(state.ropes.len(), 1);
            let rope = &state.ropes[0];
            assert_eq!(rope.hand, RopeType::Left);
            assert_eq!(rope.phase, RopePhase::Swing);
            assert!(rope.hook_point.distance(wall_point()) < 1e-3);
            assert_eq!(state.spring.velocity(), speed);

            let (parent, joint) = rig.rope_joint(rig.player);
            assert_eq!(parent, rope.hook);
            assert!((joint.max_distance() - WALL_DISTANCE).abs() < 1e-3);
            assert!(joint.motor(JointAxis::LinX).is_none());
            assert!(rig.sounds().contains(&Sfx::Grapple));
        }

        #[test]
        fn right_hook_leaves_slack() {
            let mut rig = rig(GrappleConfig::default());
            rig.click(MouseButton::Right);

            let rope = &rig.state().ropes[0];
            assert_eq!(rope.hand, RopeType::Right);
            assert!((rope.min_distance - 0.95 * WALL_DISTANCE).abs() < 1e-3);

            let (_, joint) = rig.rope_joint(rig.player);
            assert!((joint.max_distance() - 3.0 * WALL_DISTANCE).abs() < 1e-3);
        }

        #[test]
        fn new_hook_straightens_the_previous_rope() {
            let mut rig = rig(GrappleConfig::default());
            let old = latched_rope(rig.app.world_mut(), RopeType::Right);
            rig.app.world_mut().resource_mut::<GrappleState>().ropes.push(Rope { points: 51, ..old });

            rig.click(MouseButton::Left);

            let state = rig.state();
            assert_eq!(state.ropes.len(), 2);
            assert_eq!(state.ropes[0].points, 2);
            assert_eq!(state.ropes[1].points, GrappleConfig::default().segments + 1);
        }

        #[test]
        fn both_buttons_in_one_frame_fire_a_single_hook() {
            let mut rig = rig(GrappleConfig::default());
            rig.press(&[MouseButton::Left, MouseButton::Right]);

            let state = rig.state();
            assert_eq!(state.ropes.len(), 1);
            assert!(state.hooked);
            assert_eq!(state.ropes[0].phase, RopePhase::Swing);
            assert!(rig.app.world().get::<ImpulseJoint>(rig.player).is_some());
            assert!(!rig.sounds().contains(&Sfx::Release));
        }

        #[test]
        fn latch_shorter_than_the_minimum_drops_the_rope() {
            let mut rig = rig(GrappleConfig::default());
            rig.click(MouseButton::Left);
            let rope = rig.state().ropes[0].clone();

            // Same aim, so the latch lands on the hook
            rig.click(MouseButton::Left);

            let state = rig.state();
            assert!(state.ropes.is_empty());
            assert!(!state.hooked);
            assert!(rig.app.world().get::<ImpulseJoint>(rig.player).is_none());
            for entity in rope.owned_entities() {
                assert!(!rig.app.world().entities().contains(entity), "{entity:?} should be despawned");
            }
            let sounds = rig.sounds();
            assert!(sounds.contains(&Sfx::Release));
            assert!(!sounds.contains(&Sfx::Grapple));
        }

        #[test]
        fn latch_between_static_points_lays_a_plank() {
            let mut rig = rig(GrappleConfig::default());
            rig.spawn_side_target(RigidBody::Fixed);
            rig.click(MouseButton::Left);
            rig.look(Vec3::X);
            rig.click(MouseButton::Left);

            let state = rig.state();
            assert!(!state.hooked);
            assert!(state.optimize_timer.is_some());
            let rope = &state.ropes[0];
            assert_eq!(rope.phase, RopePhase::Latched);
            assert!(rope.tether.is_none());

            let world = rig.app.world();
            let plank = rope.plank.expect("static latch should lay a plank");
            assert!(world.get::<RopePlank>(plank).is_some());
            assert!(world.get::<ColliderDisabled>(rope.collider).is_none());
            assert!(world.get::<ImpulseJoint>(rig.player).is_none());
            assert!(world.get::<ImpulseJoint>(rope.hook).is_none());
            assert!(rig.sounds().contains(&Sfx::Grapple));
        }

        #[test]
        fn latch_on_a_dynamic_body_tethers_it_to_the_hook() {
            let mut rig = rig(GrappleConfig::default());
            let target = rig.spawn_side_target(RigidBody::Dynamic);
            rig.click(MouseButton::Left);
            rig.look(Vec3::X);
            rig.click(MouseButton::Left);

            let rope = rig.state().ropes[0].clone();
            assert!(rope.plank.is_none());
            let tether = rope.tether.expect("dynamic latch should tether the body");
            assert_eq!(tether.body, target);
            assert!(tether.local_anchor.distance(Vec3::new(-0.5, 0.0, 0.0)) < 1e-3);

            let length = wall_point().distance(Vec3::new(SIDE_DISTANCE, 0.0, 0.0));
            let (parent, joint) = rig.rope_joint(rope.hook);
            assert_eq!(parent, target);
            assert!((joint.max_distance() - length).abs() < 1e-3);
            assert!(joint.local_anchor1().distance(tether.local_anchor) < 1e-3);
        }

        #[test]
        fn retract_motors_the_swing_and_tether_joints() {
            let config = GrappleConfig::default();
            let (player_strength, tether_strength) = (config.player_retract_strength, config.retract_strength);
            let mut rig = rig(config);
            rig.spawn_side_target(RigidBody::Dynamic);
            rig.click(MouseButton::Left);
            rig.look(Vec3::X);
            rig.click(MouseButton::Left);
            rig.look(Vec3::NEG_Z);
            rig.click(MouseButton::Right);

            rig.click(MouseButton::Middle);

            let state = rig.state();
            assert_eq!(state.ropes.len(), 2);
            assert!(state.ropes.iter().all(|rope| rope.retracting));
            let tethered_hook = state.ropes[0].hook;
            let swing_min = state.ropes[1].min_distance;

            let (_, swing) = rig.rope_joint(rig.player);
            let motor = swing.motor(JointAxis::LinX).expect("swing joint should be motorized");
            assert!((motor.target_pos - swing_min).abs() < 1e-3);
            assert_eq!(motor.stiffness, player_strength);

            let (_, tether) = rig.rope_joint(tethered_hook);
            let motor = tether.motor(JointAxis::LinX).expect("tether should be motorized");
            assert_eq!(motor.target_pos, 0.0);
            assert_eq!(motor.stiffness, tether_strength);

            assert!(rig.sounds().contains(&Sfx::Retract));
        }

        #[test]
        fn cut_key_removes_only_the_rope_under_the_crosshair() {
            let mut rig = rig(GrappleConfig::default());
            let spawn_cuttable = |world: &mut World, hand: RopeType, at: Vec3| {
                let rope = latched_rope(world, hand);
                world.entity_mut(rope.collider).insert((
                    Transform::from_translation(at),
                    Collider::cuboid(0.2, 0.2, 0.2),
                    Sensor,
                ));
                rope
            };
            let ahead = spawn_cuttable(rig.app.world_mut(), RopeType::Left, Vec3::new(0.0, 0.0, -5.0));
            let aside = spawn_cuttable(rig.app.world_mut(), RopeType::Right, Vec3::new(5.0, 0.0, 0.0));
            rig.app.world_mut().resource_mut::<GrappleState>().ropes = vec![ahead.clone(), aside.clone()];
            rig.app.update();

            rig.tap_key(KeyCode::KeyC);

            let state = rig.state();
            assert_eq!(state.ropes.len(), 1);
            assert_eq!(state.ropes[0].collider, aside.collider);
            for entity in ahead.owned_entities() {
                assert!(!rig.app.world().entities().contains(entity), "{entity:?} should be despawned");
            }
            assert!(rig.sounds().contains(&Sfx::Release));
        }

        #[test]
        fn letting_go_of_a_held_swing_drops_the_swing_rope() {
            let mut rig = rig(GrappleConfig {
                hold_delay_to_swing: 0.0,
                ..default()
            });

            rig.app.world_mut().resource_mut::<ButtonInput<MouseButton>>().press(MouseButton::Left);
            rig.app.update();
            assert!(rig.state().hooked);

            // Still held: the swing starts
            rig.app.world_mut().resource_mut::<ButtonInput<MouseButton>>().clear();
            rig.app.update();
            assert!(rig.state().execute_swing);

            rig.app.world_mut().resource_mut::<ButtonInput<MouseButton>>().release(MouseButton::Left);
            rig.app.update();

            let state = rig.state();
            assert!(state.ropes.is_empty());
            assert!(!state.hooked);
            assert!(!state.execute_swing);
            assert!(rig.app.world().get::<ImpulseJoint>(rig.player).is_none());
            assert!(rig.sounds().contains(&Sfx::Release));
        }
    }
}
