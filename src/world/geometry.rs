//! Spawning of static blocks, physics crates, inspectable props and lights.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::builder::LevelEntity;
use super::data::{BlockDef, CrateDef, LightDef, PropDef, PropShape};
use super::materials::MaterialRegistry;
use crate::inspect::{InspectIgnore, Inspectable};

/// Spawn a static block.
pub fn spawn_block(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    mat_registry: &MaterialRegistry,
    block: &BlockDef,
) {
    let size = Vec3::from(block.size);
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::from_size(size))),
        MeshMaterial3d(mat_registry.get(&block.material)),
        Transform::from_translation(Vec3::from(block.position)),
        RigidBody::Fixed,
        Collider::cuboid(size.x / 2.0, size.y / 2.0, size.z / 2.0),
        LevelEntity,
    ));
}

/// Spawn a dynamic crate that hooks can knock around and ropes can drag.
pub fn spawn_crate(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    mat_registry: &MaterialRegistry,
    crate_def: &CrateDef,
) {
    let half = crate_def.size / 2.0;
    commands.spawn((
        Name::new("Crate"),
        Mesh3d(meshes.add(Cuboid::from_length(crate_def.size))),
        MeshMaterial3d(mat_registry.crate_material.clone()),
        Transform::from_translation(Vec3::from(crate_def.position)),
        RigidBody::Dynamic,
        Collider::cuboid(half, half, half),
        ColliderMassProperties::Density(0.5),
        Velocity::zero(),
        ExternalImpulse::default(),
        LevelEntity,
    ));
}

/// Spawn a small prop, tagged for inspection as the level asks.
pub fn spawn_prop(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    prop: &PropDef,
) {
    let (mesh, collider) = match prop.shape {
        PropShape::Cube => (
            meshes.add(Cuboid::from_length(prop.size)),
            Collider::cuboid(prop.size / 2.0, prop.size / 2.0, prop.size / 2.0),
        ),
        PropShape::Sphere => (
            meshes.add(Sphere::new(prop.size / 2.0)),
            Collider::ball(prop.size / 2.0),
        ),
        PropShape::Cylinder => (
            meshes.add(Cylinder::new(prop.size / 2.0, prop.size)),
            Collider::cylinder(prop.size / 2.0, prop.size / 2.0),
        ),
    };
    let (r, g, b) = prop.color;

    let mut entity = commands.spawn((
        Name::new("Prop"),
        Mesh3d(mesh),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(r, g, b),
            perceptual_roughness: 0.6,
            ..default()
        })),
        Transform::from_translation(Vec3::from(prop.position)),
        collider,
        LevelEntity,
    ));

    if prop.dynamic {
        entity.insert((RigidBody::Dynamic, Velocity::zero()));
    } else {
        entity.insert(RigidBody::Fixed);
    }

    if prop.ignore {
        entity.insert(InspectIgnore);
    } else if prop.inspectable {
        entity.insert(Inspectable);
    }
}

/// Spawn a point light.
pub fn spawn_light(commands: &mut Commands, light: &LightDef) {
    let (r, g, b) = light.color;
    commands.spawn((
        PointLight {
            color: Color::srgb(r, g, b),
            intensity: light.intensity,
            range: light.range,
            shadows_enabled: light.shadows,
            ..default()
        },
        Transform::from_translation(Vec3::from(light.position)),
        LevelEntity,
    ));
}
