//! Key bindings shared by every gameplay plugin.

use bevy::prelude::*;

/// Keyboard and mouse bindings.
#[derive(Resource, Debug, Clone)]
pub struct Controls {
    pub forward: KeyCode,
    pub back: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
    pub jump: KeyCode,
    pub sprint: KeyCode,
    /// Holding this suppresses hook input
    pub hook_modifier: KeyCode,
    pub hook_left: MouseButton,
    pub hook_right: MouseButton,
    pub retract: MouseButton,
    pub cut_rope: KeyCode,
    pub reset_hooks: KeyCode,
    pub inspect: KeyCode,
    pub toggle_inspectable: KeyCode,
    pub scratchpad: KeyCode,
    pub respawn: KeyCode,
    pub restart: KeyCode,
    pub quit: KeyCode,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            forward: KeyCode::KeyW,
            back: KeyCode::KeyS,
            left: KeyCode::KeyA,
            right: KeyCode::KeyD,
            jump: KeyCode::Space,
            sprint: KeyCode::ShiftLeft,
            hook_modifier: KeyCode::ControlLeft,
            hook_left: MouseButton::Left,
            hook_right: MouseButton::Right,
            retract: MouseButton::Middle,
            cut_rope: KeyCode::KeyC,
            reset_hooks: KeyCode::KeyR,
            inspect: KeyCode::KeyE,
            toggle_inspectable: KeyCode::KeyI,
            scratchpad: KeyCode::Tab,
            respawn: KeyCode::KeyQ,
            restart: KeyCode::F5,
            quit: KeyCode::Escape,
        }
    }
}
