//! World plugin - level loading, volumes and moving platforms.

use bevy::prelude::*;

use crate::checkpoint::{CheckpointStore, RespawnPoint};
use crate::core::{GameSettings, GameState};
use crate::player::{spawn_player, CameraConfig};

use super::builder::{build_level_from_data, LevelEntity};
use super::data::{load_level_definition, CurrentLevel};
use super::platforms::{move_platforms, start_platform_sounds, stop_platform_sounds, update_platform_sounds};
use super::volumes::{detect_volume_entries, scroll_volume_textures};

/// World plugin - handles level loading and world setup.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_level_definition)
            .add_systems(OnEnter(GameState::InGame), setup_level)
            .add_systems(
                Update,
                (
                    detect_volume_entries,
                    scroll_volume_textures,
                    (move_platforms, start_platform_sounds, update_platform_sounds).chain(),
                )
                    .run_if(in_state(GameState::InGame)),
            )
            .add_systems(OnExit(GameState::InGame), (stop_platform_sounds, cleanup_level).chain());
    }
}

/// Set up the level from data and put the player at the respawn point.
#[allow(clippy::too_many_arguments)]
pub fn setup_level(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
    current_level: Res<CurrentLevel>,
    settings: Res<GameSettings>,
    store: Res<CheckpointStore>,
    camera_config: Res<CameraConfig>,
) {
    let level = &current_level.definition;
    info!("Building level: {}", level.name);

    build_level_from_data(&mut commands, &mut meshes, &mut materials, &mut images, level);

    let mut spawn = level.spawn_point();
    if settings.load_last_checkpoint_on_start {
        match store.load() {
            Ok(Some(position)) => {
                info!("Starting at saved checkpoint {}", position);
                spawn = position;
            }
            Ok(None) => {}
            Err(e) => warn!("Could not load checkpoint: {}", e),
        }
    }

    commands.insert_resource(RespawnPoint(spawn));
    spawn_player(&mut commands, spawn, &camera_config);
}

/// Clean up level entities when leaving InGame state.
fn cleanup_level(
    mut commands: Commands,
    level_query: Query<Entity, With<LevelEntity>>,
    player_query: Query<Entity, With<crate::player::Player>>,
) {
    for entity in level_query.iter().chain(player_query.iter()) {
        commands.entity(entity).despawn_recursive();
    }
}
