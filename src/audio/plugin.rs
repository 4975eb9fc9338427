//! Sound library and playback of `PlaySoundEvent`s through kira.

use bevy::prelude::*;
use bevy_kira_audio::{Audio, AudioControl, AudioSource};
use std::collections::HashMap;

use crate::core::{PlaySoundEvent, Sfx};

/// Loads sound effects and plays them on request.
pub struct AudioPlugin;

impl Plugin for AudioPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_sound_library)
            .add_systems(Update, play_sound_events);
    }
}

/// Every sound effect the game can request, plus the platform loop.
#[derive(Resource, Default)]
pub struct SoundLibrary {
    effects: HashMap<Sfx, Handle<AudioSource>>,
    pub platform_loop: Handle<AudioSource>,
}

impl SoundLibrary {
    pub fn get(&self, sfx: Sfx) -> Option<&Handle<AudioSource>> {
        self.effects.get(&sfx)
    }
}

/// Asset path for a sound effect.
pub fn sfx_path(sfx: Sfx) -> &'static str {
    match sfx {
        Sfx::Grapple => "sounds/grapple.ogg",
        Sfx::Release => "sounds/release.ogg",
        Sfx::Retract => "sounds/retract.ogg",
        Sfx::PickUp => "sounds/pick_up.ogg",
        Sfx::PutDown => "sounds/put_down.ogg",
        Sfx::Zoom => "sounds/zoom.ogg",
        Sfx::Death => "sounds/death.ogg",
        Sfx::Checkpoint => "sounds/checkpoint.ogg",
        Sfx::Node => "sounds/node.ogg",
        Sfx::ScratchpadOn => "sounds/scratchpad_on.ogg",
        Sfx::ScratchpadOff => "sounds/scratchpad_off.ogg",
    }
}

const ALL_SFX: [Sfx; 11] = [
    Sfx::Grapple,
    Sfx::Release,
    Sfx::Retract,
    Sfx::PickUp,
    Sfx::PutDown,
    Sfx::Zoom,
    Sfx::Death,
    Sfx::Checkpoint,
    Sfx::Node,
    Sfx::ScratchpadOn,
    Sfx::ScratchpadOff,
];

fn load_sound_library(mut commands: Commands, asset_server: Res<AssetServer>) {
    let effects = ALL_SFX
        .iter()
        .map(|&sfx| (sfx, asset_server.load(sfx_path(sfx))))
        .collect();

    commands.insert_resource(SoundLibrary {
        effects,
        platform_loop: asset_server.load("sounds/platform_loop.ogg"),
    });
    info!("Queued {} sound effects for loading", ALL_SFX.len());
}

fn play_sound_events(
    mut events: EventReader<PlaySoundEvent>,
    library: Option<Res<SoundLibrary>>,
    audio: Res<Audio>,
) {
    let Some(library) = library else {
        events.clear();
        return;
    };

    for PlaySoundEvent(sfx) in events.read() {
        match library.get(*sfx) {
            Some(handle) => {
                audio.play(handle.clone());
            }
            None => warn!("No sound loaded for {:?}", sfx),
        }
    }
}
