//! Trigger volumes: checkpoints, resets, kill zones, node pickups and
//! rope emancipation fields.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::builder::LevelEntity;
use super::data::{VolumeDef, VolumeKind};
use super::materials::{emancipation_color, MaterialRegistry};
use crate::core::{
    CheckpointReachedEvent, DestroyRopesEvent, NodeCollectedEvent, PlaySoundEvent, PopupEvent,
    ResetPlayerEvent, RestartLevelEvent, Sfx,
};
use crate::player::PlayerHitbox;

/// A trigger volume in the level.
#[derive(Component, Debug, Clone)]
pub struct Volume {
    pub name: String,
    pub kind: VolumeKind,
}

/// Scrolls the UVs of the entity's material each frame.
#[derive(Component, Debug, Clone, Copy)]
pub struct ScrollingTexture {
    /// UV offset per second
    pub speed: Vec2,
}

pub fn spawn_volume(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    mat_registry: &MaterialRegistry,
    def: &VolumeDef,
) {
    let size = Vec3::from(def.size);
    let mut entity = commands.spawn((
        Name::new(def.name.clone()),
        Volume {
            name: def.name.clone(),
            kind: def.kind.clone(),
        },
        Transform::from_translation(Vec3::from(def.position)),
        Visibility::default(),
        Collider::cuboid(size.x / 2.0, size.y / 2.0, size.z / 2.0),
        Sensor,
        ActiveEvents::COLLISION_EVENTS,
        LevelEntity,
    ));

    if let VolumeKind::Emancipation { rope_type, scroll } = def.kind {
        entity.insert((
            Mesh3d(meshes.add(Cuboid::from_size(size))),
            MeshMaterial3d(mat_registry.volume_material(materials, emancipation_color(rope_type))),
            ScrollingTexture {
                speed: Vec2::from(scroll),
            },
        ));
    }
}

/// React to the player's hitbox entering a volume.
#[allow(clippy::too_many_arguments)]
pub fn detect_volume_entries(
    mut collisions: EventReader<CollisionEvent>,
    hitboxes: Query<(), With<PlayerHitbox>>,
    volumes: Query<(&Volume, &GlobalTransform)>,
    mut checkpoints: EventWriter<CheckpointReachedEvent>,
    mut resets: EventWriter<ResetPlayerEvent>,
    mut restarts: EventWriter<RestartLevelEvent>,
    mut nodes: EventWriter<NodeCollectedEvent>,
    mut destroy_ropes: EventWriter<DestroyRopesEvent>,
    mut sounds: EventWriter<PlaySoundEvent>,
    mut popups: EventWriter<PopupEvent>,
) {
    for event in collisions.read() {
        let CollisionEvent::Started(a, b, _) = *event else {
            continue;
        };
        let volume_entity = if hitboxes.contains(a) {
            b
        } else if hitboxes.contains(b) {
            a
        } else {
            continue;
        };
        let Ok((volume, transform)) = volumes.get(volume_entity) else {
            continue;
        };

        match &volume.kind {
            VolumeKind::Checkpoint => {
                checkpoints.send(CheckpointReachedEvent {
                    volume: volume_entity,
                    name: volume.name.clone(),
                    position: transform.translation(),
                });
            }
            VolumeKind::Reset => {
                resets.send(ResetPlayerEvent);
            }
            VolumeKind::Kill => {
                info!("Player died!");
                restarts.send(RestartLevelEvent);
            }
            VolumeKind::NodePickup(node) => {
                popups.send(PopupEvent(format!("Node collected: {}", node.id)));
                sounds.send(PlaySoundEvent(Sfx::Node));
                nodes.send(NodeCollectedEvent { node: node.clone() });
                info!("Node collected!");
            }
            VolumeKind::Emancipation { rope_type, .. } => {
                destroy_ropes.send(DestroyRopesEvent(Some(*rope_type)));
            }
        }
    }
}

pub fn scroll_volume_textures(
    time: Res<Time>,
    volumes: Query<(&ScrollingTexture, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let dt = time.delta_secs();
    for (scrolling, material) in volumes.iter() {
        if let Some(material) = materials.get_mut(&material.0) {
            material.uv_transform.translation += scrolling.speed * dt;
        }
    }
}
