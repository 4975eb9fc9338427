//! Grapple plugin - hooks, latches and rope rendering.

use bevy::prelude::*;
use bevy::transform::TransformSystem;

use super::components::GrappleState;
use super::config::load_grapple_config;
use super::systems::*;
use crate::core::{GameState, PlayState};

pub struct GrapplePlugin;

impl Plugin for GrapplePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GrappleState>()
            .init_gizmo_group::<SwingRopeGizmos>()
            .init_gizmo_group::<LatchedRopeGizmos>()
            .add_systems(
                Startup,
                (load_grapple_config, setup_grapple_assets, init_grapple_state).chain(),
            )
            .add_systems(
                Update,
                (hook_input, fire_hooks, retract_ropes, cut_ropes)
                    .chain()
                    .run_if(in_state(GameState::InGame))
                    .run_if(in_state(PlayState::Exploring)),
            )
            .add_systems(
                Update,
                (handle_destroy_ropes, tick_rope_optimizer)
                    .after(cut_ropes)
                    .run_if(in_state(GameState::InGame)),
            )
            .add_systems(
                PostUpdate,
                draw_ropes
                    .after(TransformSystem::TransformPropagate)
                    .run_if(in_state(GameState::InGame)),
            )
            .add_systems(OnExit(GameState::InGame), reset_grapple_state);
    }
}
