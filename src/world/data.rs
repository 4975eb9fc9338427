//! Level data structures and RON loading.

use bevy::prelude::*;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::error::DataLoadError;
use super::platforms::PlatformEase;
use crate::core::RopeType;
use crate::scratchpad::NodeData;

pub const LEVEL_PATH: &str = "assets/data/levels/prototype.ron";

fn default_material() -> String {
    "concrete".to_string()
}

fn default_true() -> bool {
    true
}

fn default_crate_size() -> f32 {
    1.0
}

fn default_prop_color() -> (f32, f32, f32) {
    (0.8, 0.8, 0.8)
}

fn default_light_color() -> (f32, f32, f32) {
    (1.0, 0.95, 0.9)
}

fn default_light_range() -> f32 {
    20.0
}

fn default_scroll() -> (f32, f32) {
    (0.1, 0.2)
}

fn default_local_move() -> (f32, f32, f32) {
    (0.0, 0.0, -5.0)
}

fn default_duration() -> f32 {
    5.0
}

fn default_max_volume() -> f32 {
    1.0
}

/// Global ambient light settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GlobalAmbientDef {
    pub color: (f32, f32, f32),
    pub brightness: f32,
}

impl Default for GlobalAmbientDef {
    fn default() -> Self {
        Self {
            color: (0.8, 0.85, 1.0),
            brightness: 400.0,
        }
    }
}

/// Static box the player can stand on and hook into.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockDef {
    pub position: (f32, f32, f32),
    pub size: (f32, f32, f32),
    #[serde(default = "default_material")]
    pub material: String,
}

/// Loose physics crate that ropes can latch onto and drag.
#[derive(Debug, Clone, Deserialize)]
pub struct CrateDef {
    pub position: (f32, f32, f32),
    #[serde(default = "default_crate_size")]
    pub size: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum PropShape {
    Cube,
    Sphere,
    Cylinder,
}

/// Small object that can be picked up with the inspect key.
#[derive(Debug, Clone, Deserialize)]
pub struct PropDef {
    pub position: (f32, f32, f32),
    pub shape: PropShape,
    pub size: f32,
    #[serde(default = "default_prop_color")]
    pub color: (f32, f32, f32),
    /// Starts out inspectable; the toggle key can change it later
    #[serde(default = "default_true")]
    pub inspectable: bool,
    /// Never inspectable
    #[serde(default)]
    pub ignore: bool,
    #[serde(default = "default_true")]
    pub dynamic: bool,
}

/// What happens when the player walks into a volume.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum VolumeKind {
    Checkpoint,
    Reset,
    Kill,
    NodePickup(NodeData),
    Emancipation {
        rope_type: RopeType,
        /// Texture scroll speed (x, y) per second
        #[serde(default = "default_scroll")]
        scroll: (f32, f32),
    },
}

/// Trigger volume.
#[derive(Debug, Clone, Deserialize)]
pub struct VolumeDef {
    pub name: String,
    pub position: (f32, f32, f32),
    pub size: (f32, f32, f32),
    pub kind: VolumeKind,
}

/// Kinematic platform ping-ponging between its position and `position + local_move`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformDef {
    pub position: (f32, f32, f32),
    pub size: (f32, f32, f32),
    #[serde(default = "default_local_move")]
    pub local_move: (f32, f32, f32),
    #[serde(default = "default_duration")]
    pub duration: f32,
    #[serde(default)]
    pub ease: PlatformEase,
    #[serde(default = "default_max_volume")]
    pub max_volume: f32,
}

/// Point light.
#[derive(Debug, Clone, Deserialize)]
pub struct LightDef {
    pub position: (f32, f32, f32),
    pub intensity: f32,
    #[serde(default)]
    pub shadows: bool,
    #[serde(default = "default_light_color")]
    pub color: (f32, f32, f32),
    #[serde(default = "default_light_range")]
    pub range: f32,
}

/// Complete level definition loaded from RON.
#[derive(Debug, Clone, Deserialize)]
pub struct LevelDefinition {
    pub name: String,
    pub player_spawn: (f32, f32, f32),
    #[serde(default)]
    pub global_ambient: GlobalAmbientDef,
    #[serde(default)]
    pub blocks: Vec<BlockDef>,
    #[serde(default)]
    pub crates: Vec<CrateDef>,
    #[serde(default)]
    pub props: Vec<PropDef>,
    #[serde(default)]
    pub volumes: Vec<VolumeDef>,
    #[serde(default)]
    pub platforms: Vec<PlatformDef>,
    #[serde(default)]
    pub lights: Vec<LightDef>,
    /// Nodes in the scratchpad from the start
    #[serde(default)]
    pub seed_nodes: Vec<NodeData>,
}

impl Default for LevelDefinition {
    /// A bare floor to stand on when no level file could be loaded.
    fn default() -> Self {
        Self {
            name: "fallback".to_string(),
            player_spawn: (0.0, 2.0, 0.0),
            global_ambient: GlobalAmbientDef::default(),
            blocks: vec![BlockDef {
                position: (0.0, -0.5, 0.0),
                size: (40.0, 1.0, 40.0),
                material: default_material(),
            }],
            crates: Vec::new(),
            props: Vec::new(),
            volumes: Vec::new(),
            platforms: Vec::new(),
            lights: Vec::new(),
            seed_nodes: Vec::new(),
        }
    }
}

impl LevelDefinition {
    /// Parse and validate a level. `path` is only used in error messages.
    pub fn from_ron(contents: &str, path: &str) -> Result<Self, DataLoadError> {
        let level: Self = ron::from_str(contents).map_err(|e| DataLoadError::ParseError {
            path: path.to_string(),
            details: e.to_string(),
        })?;

        if let Some((index, platform)) = level
            .platforms
            .iter()
            .enumerate()
            .find(|(_, platform)| platform.duration <= 0.0)
        {
            return Err(DataLoadError::InvalidPlatform {
                index,
                duration: platform.duration,
            });
        }
        Ok(level)
    }

    /// Read and parse a level file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataLoadError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        if !path.exists() {
            return Err(DataLoadError::FileNotFound(display));
        }
        let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
            path: display.clone(),
            details: e.to_string(),
        })?;
        Self::from_ron(&contents, &display)
    }

    pub fn spawn_point(&self) -> Vec3 {
        Vec3::from(self.player_spawn)
    }
}

/// The level being played.
#[derive(Resource, Debug, Clone, Default)]
pub struct CurrentLevel {
    pub definition: LevelDefinition,
}

/// Load the level definition, falling back to a bare floor.
pub fn load_level_definition(mut commands: Commands) {
    let definition = match LevelDefinition::load(LEVEL_PATH) {
        Ok(level) => {
            info!(
                "Loaded level '{}': {} blocks, {} volumes, {} platforms",
                level.name,
                level.blocks.len(),
                level.volumes.len(),
                level.platforms.len()
            );
            level
        }
        Err(e) => {
            error!("{}. Using fallback level.", e);
            LevelDefinition::default()
        }
    };
    commands.insert_resource(CurrentLevel { definition });
}
