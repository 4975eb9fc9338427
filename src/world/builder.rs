//! Level construction from data definitions.

use bevy::prelude::*;

use super::data::LevelDefinition;
use super::geometry::{spawn_block, spawn_crate, spawn_light, spawn_prop};
use super::materials::MaterialRegistry;
use super::platforms::spawn_platform;
use super::volumes::spawn_volume;

/// Marker for everything the level owns; despawned when the level ends.
#[derive(Component)]
pub struct LevelEntity;

/// Build a level from a level definition.
pub fn build_level_from_data(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    images: &mut Assets<Image>,
    level: &LevelDefinition,
) {
    let mat_registry = MaterialRegistry::new(materials, images);

    setup_environment(commands, level);

    for block in &level.blocks {
        spawn_block(commands, meshes, &mat_registry, block);
    }
    for crate_def in &level.crates {
        spawn_crate(commands, meshes, &mat_registry, crate_def);
    }
    for prop in &level.props {
        spawn_prop(commands, meshes, materials, prop);
    }
    for volume in &level.volumes {
        spawn_volume(commands, meshes, materials, &mat_registry, volume);
    }
    for platform in &level.platforms {
        spawn_platform(commands, meshes, &mat_registry, platform);
    }
    for light in &level.lights {
        spawn_light(commands, light);
    }
}

/// Set up global ambient light and the sun.
fn setup_environment(commands: &mut Commands, level: &LevelDefinition) {
    let (r, g, b) = level.global_ambient.color;
    commands.insert_resource(AmbientLight {
        color: Color::srgb(r, g, b),
        brightness: level.global_ambient.brightness,
    });

    commands.spawn((
        DirectionalLight {
            color: Color::srgb(1.0, 0.97, 0.92),
            illuminance: 8000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::XYZ,
            -std::f32::consts::FRAC_PI_3,
            std::f32::consts::FRAC_PI_6,
            0.0,
        )),
        LevelEntity,
    ));
}
