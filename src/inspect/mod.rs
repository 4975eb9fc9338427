//! Inspect module - pick up tagged objects, turn them over and zoom in.

mod components;
mod plugin;
mod systems;

pub use components::{AimIndicator, InspectConfig, InspectIgnore, InspectState, Inspectable};
pub use plugin::InspectPlugin;
