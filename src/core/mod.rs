//! Core game module - states, events, controls, settings and tweening.
//!
//! This module provides the foundation that all other game systems build upon.

mod controls;
mod events;
mod plugin;
mod settings;
mod states;
mod tween;

pub use controls::Controls;
pub use events::*;
pub use plugin::CorePlugin;
pub use settings::GameSettings;
pub use states::*;
pub use tween::*;
