//! Core plugin that sets up game states, events, and game-manager input.

use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};

use super::controls::Controls;
use super::events::*;
use super::settings::GameSettings;
use super::states::*;
use super::tween::*;

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Loading, InGame) and the PlayState sub-state
/// - Global events shared between plugins
/// - Quit / respawn / restart keys
/// - Pausing virtual time while the cursor is free
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app
            .init_state::<GameState>()
            .add_sub_state::<PlayState>()
            .init_resource::<Controls>()
            .init_resource::<GameSettings>()

            .add_event::<PlaySoundEvent>()
            .add_event::<PopupEvent>()
            .add_event::<DestroyRopesEvent>()
            .add_event::<ResetPlayerEvent>()
            .add_event::<RestartLevelEvent>()
            .add_event::<CheckpointReachedEvent>()
            .add_event::<NodeCollectedEvent>()

            // Loading has nothing asynchronous to wait on; data files are
            // read at Startup, so enter the level on the next frame.
            .add_systems(OnEnter(GameState::Loading), enter_game)

            .add_systems(
                Update,
                (game_manager_input, restart_level)
                    .chain()
                    .run_if(in_state(GameState::InGame)),
            )
            .add_systems(Update, (sync_time_with_cursor, update_smooth_transforms));
    }
}

fn enter_game(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::InGame);
}

/// Quit, respawn and restart keys.
fn game_manager_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    controls: Res<Controls>,
    mut exit: EventWriter<AppExit>,
    mut reset_events: EventWriter<ResetPlayerEvent>,
    mut restart_events: EventWriter<RestartLevelEvent>,
) {
    if keyboard.just_pressed(controls.quit) {
        info!("Quit requested");
        exit.send(AppExit::Success);
    }
    if keyboard.just_pressed(controls.respawn) {
        reset_events.send(ResetPlayerEvent);
    }
    if keyboard.just_pressed(controls.restart) {
        restart_events.send(RestartLevelEvent);
    }
}

/// Restart goes back through Loading so the level is despawned and rebuilt.
fn restart_level(
    mut events: EventReader<RestartLevelEvent>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if events.read().last().is_some() {
        info!("Restarting level");
        next_state.set(GameState::Loading);
    }
}

/// Freeze gameplay time whenever the cursor is not locked.
fn sync_time_with_cursor(
    window_query: Query<&Window, With<PrimaryWindow>>,
    mut time: ResMut<Time<Virtual>>,
) {
    let Ok(window) = window_query.get_single() else {
        return;
    };

    let locked = window.cursor_options.grab_mode == CursorGrabMode::Locked;
    if locked && time.is_paused() {
        time.unpause();
    } else if !locked && !time.is_paused() {
        time.pause();
    }
}
