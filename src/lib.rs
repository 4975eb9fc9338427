//! Grapple FPC - a first-person grappling-hook prototype in Bevy.
//!
//! # Architecture
//!
//! The game is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Game states, global events, tweening, game-manager input
//! - **Audio**: Sound library and one-shot playback
//! - **Player**: Rigid-body movement and the first-person perspective
//! - **Grapple**: Hooks, latches, rope joints, rope visuals and cutting
//! - **Inspect**: Picking up and rotating objects in front of the camera
//! - **World**: Level data, trigger volumes, moving platforms
//! - **Checkpoint**: Respawn point and the persisted last checkpoint
//! - **Scratchpad**: Collected nodes and the overlay listing them
//! - **UI**: Crosshair, inspect icon, info popups

pub mod audio;
pub mod checkpoint;
pub mod core;
pub mod grapple;
pub mod inspect;
pub mod player;
pub mod scratchpad;
pub mod ui;
pub mod world;

#[cfg(test)]
mod testing;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
pub struct GrappleFpcPlugin;

impl Plugin for GrappleFpcPlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)

            // Sound library
            .add_plugins(audio::AudioPlugin)

            // Player systems
            .add_plugins(player::PlayerPlugin)

            // Grappling hook
            .add_plugins(grapple::GrapplePlugin)

            // Object inspection
            .add_plugins(inspect::InspectPlugin)

            // Checkpoint persistence
            .add_plugins(checkpoint::CheckpointPlugin)

            // Collected nodes
            .add_plugins(scratchpad::ScratchpadPlugin)

            // World systems
            .add_plugins(world::WorldPlugin)

            // UI systems
            .add_plugins(ui::UiPlugin);
    }
}
