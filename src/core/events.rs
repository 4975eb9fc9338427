//! Global events used for cross-system communication.
//!
//! Trigger volumes, the grapple and the scratchpad never call into each
//! other directly. They send these events and whoever owns the affected
//! state reacts, which keeps the plugins independent.

use bevy::prelude::*;
use serde::Deserialize;

/// Which hook button a rope came from, or both of them.
///
/// Used by emancipation volumes to cut a subset of the player's ropes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum RopeType {
    #[default]
    Both,
    Left,
    Right,
}

/// Sound effects that gameplay can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sfx {
    Grapple,
    Release,
    Retract,
    PickUp,
    PutDown,
    Zoom,
    Death,
    Checkpoint,
    Node,
    ScratchpadOn,
    ScratchpadOff,
}

/// Play a one-shot sound effect.
#[derive(Event, Debug, Clone, Copy)]
pub struct PlaySoundEvent(pub Sfx);

/// Show a short message in the middle of the screen.
#[derive(Event, Debug, Clone)]
pub struct PopupEvent(pub String);

/// Destroy the player's ropes.
///
/// `None` or `Some(RopeType::Both)` destroys every rope.
#[derive(Event, Debug, Clone, Copy)]
pub struct DestroyRopesEvent(pub Option<RopeType>);

/// Put the player back on the respawn point.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ResetPlayerEvent;

/// Tear the level down and build it again.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct RestartLevelEvent;

/// Sent when the player walks into a checkpoint volume.
#[derive(Event, Debug, Clone)]
pub struct CheckpointReachedEvent {
    /// The volume entity
    pub volume: Entity,
    /// Display name of the checkpoint
    pub name: String,
    /// World position the player will respawn at
    pub position: Vec3,
}

/// Sent when the player walks into a node pickup volume.
#[derive(Event, Debug, Clone)]
pub struct NodeCollectedEvent {
    pub node: crate::scratchpad::NodeData,
}
