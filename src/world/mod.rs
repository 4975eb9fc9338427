//! World module - level data, trigger volumes and moving platforms.

mod builder;
mod data;
mod error;
mod geometry;
mod materials;
mod platforms;
mod plugin;
mod volumes;

pub use builder::LevelEntity;
pub use data::{CurrentLevel, LevelDefinition, VolumeKind};
pub use error::DataLoadError;
pub use platforms::{MovingPlatform, PlatformEase};
pub use plugin::{setup_level, WorldPlugin};
pub use volumes::Volume;
