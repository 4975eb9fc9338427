//! Checkpoint module - the respawn point and the persisted last checkpoint.

mod plugin;
mod store;

pub use plugin::{CheckpointPlugin, RespawnPoint};
pub use store::{CheckpointError, CheckpointStore, SavedCheckpoint};
