//! UI plugin - HUD, popups and the scratchpad overlay.

use bevy::prelude::*;

use super::{hud, panel, popup};

/// UI plugin - handles all user interface.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        hud::setup_hud_systems(app);
        popup::setup_popup_systems(app);
        panel::setup_panel_systems(app);
    }
}
