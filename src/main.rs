//! Grapple FPC - Entry Point
//!
//! A first-person traversal prototype built around a two-handed grappling hook.
//!
//! Controls:
//! - WASD: Move, Space: Jump, Shift: Sprint
//! - Mouse: Look around
//! - Left/Right click: Fire hook (hold to swing, click again to latch)
//! - Middle click: Retract ropes
//! - C (hold): Cut rope under the crosshair, R: Reset all ropes
//! - E: Inspect, I: Toggle inspectable
//! - Tab: Scratchpad
//! - Q: Respawn, F5: Restart level, Escape: Quit

use bevy::prelude::*;
use bevy_kira_audio::AudioPlugin as KiraAudioPlugin;
use bevy_rapier3d::prelude::*;

fn main() {
    App::new()
        // Bevy default plugins, with bevy's own audio swapped out for kira
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Grapple FPC".to_string(),
                        resolution: (1280.0, 720.0).into(),
                        ..default()
                    }),
                    ..default()
                })
                .disable::<bevy::audio::AudioPlugin>(),
        )

        // Physics
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())

        // Audio
        .add_plugins(KiraAudioPlugin)

        // Our game plugin
        .add_plugins(grapple_fpc::GrappleFpcPlugin)

        .run();
}
