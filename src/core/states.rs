//! Game state definitions that control the overall flow of the game.
//!
//! States determine which systems run at any given time. For example,
//! hook firing only runs while exploring, while the inspection controls
//! only run while an object is held up to the camera.

use bevy::prelude::*;

/// Main game states - controls overall game flow.
///
/// - Start in `Loading` to read data files
/// - Enter `InGame` once the level definition is available
/// - Restarting the level goes back through `Loading`, which despawns and
///   rebuilds everything the level owns
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Data files are being read
    #[default]
    Loading,
    /// Active gameplay
    InGame,
}

/// Sub-states for gameplay - only active when GameState::InGame.
///
/// - `Exploring`: Movement, looking, hooks and volumes
/// - `Inspecting`: An object is held in front of the camera
/// - `Scratchpad`: The node overlay is open and the cursor is free
#[derive(SubStates, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
#[source(GameState = GameState::InGame)]
pub enum PlayState {
    #[default]
    Exploring,
    Inspecting,
    Scratchpad,
}
