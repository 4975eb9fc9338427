//! Game-wide settings that are not tied to one plugin.

use bevy::prelude::*;

/// Where the last checkpoint is stored between sessions.
pub const CHECKPOINT_PATH: &str = "saves/checkpoint.ron";

#[derive(Resource, Debug, Clone)]
pub struct GameSettings {
    /// Start the level at the saved checkpoint, if there is one
    pub load_last_checkpoint_on_start: bool,
    /// Seconds an info popup stays on screen
    pub popup_duration: f32,
    pub checkpoint_path: String,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            load_last_checkpoint_on_start: true,
            popup_duration: 3.0,
            checkpoint_path: CHECKPOINT_PATH.to_string(),
        }
    }
}
