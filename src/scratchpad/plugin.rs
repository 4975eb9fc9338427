//! Scratchpad plugin - collecting nodes and opening the overlay.

use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};

use super::components::*;
use crate::core::{Controls, GameState, NodeCollectedEvent, PlaySoundEvent, PlayState, Sfx};
use crate::world::CurrentLevel;

pub struct ScratchpadPlugin;

impl Plugin for ScratchpadPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Scratchpad>()
            .add_event::<ScratchpadNoticeEvent>()
            .add_systems(OnEnter(GameState::InGame), seed_scratchpad)
            .add_systems(
                Update,
                (toggle_scratchpad, collect_nodes).run_if(in_state(GameState::InGame)),
            )
            .add_systems(OnEnter(PlayState::Scratchpad), open_scratchpad)
            .add_systems(OnExit(PlayState::Scratchpad), close_scratchpad);
    }
}

fn add_and_announce(scratchpad: &mut Scratchpad, node: NodeData, notices: &mut EventWriter<ScratchpadNoticeEvent>) {
    let id = node.id.clone();
    if scratchpad.add_node(node) {
        info!("Picked up {}!", id);
        notices.send(ScratchpadNoticeEvent(format!("{} added to scratchpad!", id)));
    } else {
        debug!("{} is already in the scratchpad", id);
    }
}

/// Start each level with only its seed nodes.
fn seed_scratchpad(
    level: Res<CurrentLevel>,
    mut scratchpad: ResMut<Scratchpad>,
    mut notices: EventWriter<ScratchpadNoticeEvent>,
) {
    scratchpad.nodes.clear();
    scratchpad.open = false;
    for node in &level.definition.seed_nodes {
        add_and_announce(&mut scratchpad, node.clone(), &mut notices);
    }
}

fn collect_nodes(
    mut events: EventReader<NodeCollectedEvent>,
    mut scratchpad: ResMut<Scratchpad>,
    mut notices: EventWriter<ScratchpadNoticeEvent>,
) {
    for event in events.read() {
        add_and_announce(&mut scratchpad, event.node.clone(), &mut notices);
    }
}

/// Tab opens the overlay while exploring and closes it again.
fn toggle_scratchpad(
    keyboard: Res<ButtonInput<KeyCode>>,
    controls: Res<Controls>,
    state: Res<State<PlayState>>,
    mut next_state: ResMut<NextState<PlayState>>,
) {
    if !keyboard.just_pressed(controls.scratchpad) {
        return;
    }
    match state.get() {
        PlayState::Exploring => next_state.set(PlayState::Scratchpad),
        PlayState::Scratchpad => next_state.set(PlayState::Exploring),
        PlayState::Inspecting => {}
    }
}

fn open_scratchpad(
    mut scratchpad: ResMut<Scratchpad>,
    mut window_query: Query<&mut Window, With<PrimaryWindow>>,
    mut sounds: EventWriter<PlaySoundEvent>,
) {
    scratchpad.open = true;
    if let Ok(mut window) = window_query.get_single_mut() {
        window.cursor_options.grab_mode = CursorGrabMode::None;
        window.cursor_options.visible = true;
    }
    sounds.send(PlaySoundEvent(Sfx::ScratchpadOn));
}

/// Closing hands the cursor back to the player through `PlayState::Exploring`.
fn close_scratchpad(mut scratchpad: ResMut<Scratchpad>, mut sounds: EventWriter<PlaySoundEvent>) {
    scratchpad.open = false;
    sounds.send(PlaySoundEvent(Sfx::ScratchpadOff));
}
