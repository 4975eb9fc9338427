//! Inspect plugin.

use bevy::prelude::*;

use super::components::*;
use super::systems::*;
use crate::core::{GameState, PlayState};

pub struct InspectPlugin;

impl Plugin for InspectPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InspectConfig>()
            .init_resource::<InspectState>()
            .init_resource::<AimIndicator>()
            .add_systems(
                Update,
                look_for_inspectables
                    .run_if(in_state(GameState::InGame))
                    .run_if(in_state(PlayState::Exploring)),
            )
            .add_systems(Update, inspect_object.run_if(in_state(PlayState::Inspecting)))
            .add_systems(OnExit(PlayState::Inspecting), finish_inspection);
    }
}
