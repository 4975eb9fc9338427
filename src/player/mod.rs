//! Player module - rigid-body movement and the first-person perspective.

mod components;
mod movement;
mod perspective;
mod plugin;

pub use components::*;
pub use movement::spawn_player;
pub use perspective::PlayerCamera;
pub use plugin::PlayerPlugin;
