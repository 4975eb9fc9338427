//! Checkpoint plugin - respawn point, saving checkpoints and resetting
//! the player.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::store::CheckpointStore;
use crate::core::{
    CheckpointReachedEvent, DestroyRopesEvent, GameSettings, GameState, PlaySoundEvent, PopupEvent,
    ResetPlayerEvent, Sfx,
};
use crate::player::Player;

/// Where the player comes back after a reset.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct RespawnPoint(pub Vec3);

pub struct CheckpointPlugin;

impl Plugin for CheckpointPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RespawnPoint>()
            .add_systems(Startup, open_checkpoint_store)
            .add_systems(
                Update,
                (reach_checkpoints, reset_player)
                    .chain()
                    .run_if(in_state(GameState::InGame)),
            );
    }
}

fn open_checkpoint_store(mut commands: Commands, settings: Res<GameSettings>) {
    let store = CheckpointStore::new(&settings.checkpoint_path);
    info!("Checkpoints are stored in {}", store.path().display());
    commands.insert_resource(store);
}

/// Save the checkpoint, move the respawn point and switch the volume off.
fn reach_checkpoints(
    mut commands: Commands,
    mut events: EventReader<CheckpointReachedEvent>,
    store: Res<CheckpointStore>,
    mut respawn: ResMut<RespawnPoint>,
    mut sounds: EventWriter<PlaySoundEvent>,
    mut popups: EventWriter<PopupEvent>,
) {
    for event in events.read() {
        sounds.send(PlaySoundEvent(Sfx::Checkpoint));

        if let Some(mut volume) = commands.get_entity(event.volume) {
            volume.insert((ColliderDisabled, Visibility::Hidden));
        }

        match store.save(event.position) {
            Ok(()) => info!("Checkpoint '{}' saved at {}", event.name, event.position),
            Err(e) => error!("Failed to save checkpoint '{}': {}", event.name, e),
        }

        respawn.0 = event.position;
        popups.send(PopupEvent(format!("{} checkpoint reached!", event.name)));
    }
}

/// Cut every rope and put the player back on the respawn point at rest.
fn reset_player(
    mut events: EventReader<ResetPlayerEvent>,
    respawn: Res<RespawnPoint>,
    mut player_query: Query<(&mut Transform, &mut Velocity), With<Player>>,
    mut destroy_ropes: EventWriter<DestroyRopesEvent>,
    mut sounds: EventWriter<PlaySoundEvent>,
) {
    if events.read().last().is_none() {
        return;
    }

    destroy_ropes.send(DestroyRopesEvent(None));
    sounds.send(PlaySoundEvent(Sfx::Death));

    let Ok((mut transform, mut velocity)) = player_query.get_single_mut() else {
        return;
    };
    *velocity = Velocity::zero();
    transform.translation = respawn.0;
    info!("Player got reset!");
}
