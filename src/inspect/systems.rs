//! Look-at detection, pickup, turning and putting objects back.

use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::components::*;
use crate::core::{lerp_factor, Controls, PlaySoundEvent, PlayState, Sfx};
use crate::player::{InspectPoint, Player, PlayerCamera};

/// Pixel scroll deltas per line of zoom.
const PIXELS_PER_LINE: f32 = 20.0;

/// Update the crosshair for what the camera looks at, and handle the
/// toggle and inspect keys.
#[allow(clippy::too_many_arguments)]
pub fn look_for_inspectables(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    controls: Res<Controls>,
    config: Res<InspectConfig>,
    mut state: ResMut<InspectState>,
    mut aim: ResMut<AimIndicator>,
    mut next_state: ResMut<NextState<PlayState>>,
    rapier_context: Query<&RapierContext>,
    camera_query: Query<&GlobalTransform, With<PlayerCamera>>,
    player_query: Query<Entity, With<Player>>,
    inspect_point_query: Query<&Transform, With<InspectPoint>>,
    candidates: Query<(&Transform, Option<&RigidBody>, Has<Inspectable>, Has<InspectIgnore>)>,
    mut sounds: EventWriter<PlaySoundEvent>,
) {
    let (Ok(context), Ok(camera)) = (rapier_context.get_single(), camera_query.get_single()) else {
        return;
    };

    let mut filter = QueryFilter::default().exclude_sensors();
    if let Ok(player) = player_query.get_single() {
        filter = filter.exclude_rigid_body(player);
    }

    let hit = context.cast_ray(
        camera.translation(),
        camera.forward().as_vec3(),
        config.max_pickup_distance,
        true,
        filter,
    );
    let Some((entity, _)) = hit else {
        aim.set_if_neq(AimIndicator::Dot);
        return;
    };
    let Ok((transform, body, inspectable, ignored)) = candidates.get(entity) else {
        aim.set_if_neq(AimIndicator::Dot);
        return;
    };

    aim.set_if_neq(if inspectable { AimIndicator::Inspect } else { AimIndicator::Dot });

    if ignored {
        return;
    }

    if keyboard.just_pressed(controls.toggle_inspectable) {
        if inspectable {
            commands.entity(entity).remove::<Inspectable>();
            info!("{:?} is no longer inspectable", entity);
        } else {
            commands.entity(entity).insert(Inspectable);
            info!("{:?} is now inspectable", entity);
        }
    } else if keyboard.just_pressed(controls.inspect) && inspectable {
        let Ok(inspect_point) = inspect_point_query.get_single() else {
            return;
        };
        let session = InspectSession::new(entity, *transform, body.copied(), inspect_point.translation);

        let mut entity_commands = commands.entity(entity);
        entity_commands.insert(ColliderDisabled);
        if let Some(held) = session.held_body() {
            entity_commands.insert(held);
        }

        state.session = Some(session);
        *aim = AimIndicator::Hidden;
        next_state.set(PlayState::Inspecting);
        sounds.send(PlaySoundEvent(Sfx::PickUp));
        info!("Inspecting {:?}", entity);
    }
}

/// Pull the held object to the inspect point, turn it with the mouse and
/// zoom with the scroll wheel. The inspect key puts it back.
#[allow(clippy::too_many_arguments)]
pub fn inspect_object(
    keyboard: Res<ButtonInput<KeyCode>>,
    controls: Res<Controls>,
    time: Res<Time>,
    config: Res<InspectConfig>,
    mut state: ResMut<InspectState>,
    mut next_state: ResMut<NextState<PlayState>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut mouse_wheel: EventReader<MouseWheel>,
    mut inspect_point_query: Query<(&mut Transform, &GlobalTransform), With<InspectPoint>>,
    mut objects: Query<&mut Transform, Without<InspectPoint>>,
    mut sounds: EventWriter<PlaySoundEvent>,
) {
    if keyboard.just_pressed(controls.inspect) {
        next_state.set(PlayState::Exploring);
        return;
    }

    let Some(session) = state.session.as_mut() else {
        next_state.set(PlayState::Exploring);
        return;
    };
    let Ok((mut inspect_point, inspect_global)) = inspect_point_query.get_single_mut() else {
        return;
    };

    session.rotation_input += mouse_motion.read().map(|event| event.delta).sum::<Vec2>();

    let scroll: f32 = mouse_wheel
        .read()
        .map(|event| match event.unit {
            MouseScrollUnit::Line => event.y,
            MouseScrollUnit::Pixel => event.y / PIXELS_PER_LINE,
        })
        .sum();
    if scroll != 0.0 {
        inspect_point.translation = zoom_inspect_point(
            inspect_point.translation,
            scroll,
            config.zoom_speed,
            config.min_inspect_distance,
        );
        sounds.send(PlaySoundEvent(Sfx::Zoom));
    }

    let Ok(mut transform) = objects.get_mut(session.entity) else {
        warn!("Inspected object {:?} vanished", session.entity);
        next_state.set(PlayState::Exploring);
        return;
    };
    let target = inspect_global.translation();
    transform.translation = transform
        .translation
        .lerp(target, lerp_factor(config.pickup_speed, time.delta_secs()));
    transform.rotation = session.rotation(config.rotate_speed);
}

/// Put the inspected object back exactly where it was picked up.
pub fn finish_inspection(
    mut commands: Commands,
    mut state: ResMut<InspectState>,
    mut aim: ResMut<AimIndicator>,
    mut inspect_point_query: Query<&mut Transform, With<InspectPoint>>,
    mut objects: Query<(&mut Transform, Option<&mut Velocity>), Without<InspectPoint>>,
    mut sounds: EventWriter<PlaySoundEvent>,
) {
    *aim = AimIndicator::Dot;
    let Some(session) = state.session.take() else {
        return;
    };

    if let Ok(mut inspect_point) = inspect_point_query.get_single_mut() {
        inspect_point.translation = session.original_distance;
    }

    if let Ok((mut transform, velocity)) = objects.get_mut(session.entity) {
        *transform = session.origin;
        if let Some(mut velocity) = velocity {
            *velocity = Velocity::zero();
        }
        let mut entity_commands = commands.entity(session.entity);
        entity_commands.remove::<ColliderDisabled>();
        if let Some(body) = session.body {
            entity_commands.insert(body);
        }
    }

    sounds.send(PlaySoundEvent(Sfx::PutDown));
    info!("Put down {:?}", session.entity);
}
