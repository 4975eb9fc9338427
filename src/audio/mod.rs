//! Audio module - the sound library and one-shot playback.

mod plugin;

pub use plugin::{AudioPlugin, SoundLibrary};
