//! Grapple tuning loaded from an external RON file.
//!
//! Allows tweaking hook, joint and rope-visual parameters without recompilation.

use bevy::prelude::*;
use serde::Deserialize;
use std::fs;

pub const GRAPPLE_CONFIG_PATH: &str = "assets/data/config/grapple.ron";

/// Grapple configuration loaded from assets/data/config/grapple.ron.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GrappleConfig {
    // Hook
    /// Maximum range of the first hook
    pub hook_distance: f32,
    /// Latched ropes shorter than this snap immediately
    pub minimum_rope_length: f32,
    pub release_impulse_factor: f32,
    /// Seconds a button must be held before the player starts swinging
    pub hold_delay_to_swing: f32,
    pub player_retract_strength: f32,
    pub retract_strength: f32,
    pub retract_damping: f32,
    pub latch_on_impulse: f32,
    /// Right-hand ropes allow this much slack over the hooked distance
    pub right_rope_slack: f32,

    // Rope
    pub left_rope_color: (f32, f32, f32),
    pub right_rope_color: (f32, f32, f32),
    pub start_thickness: f32,
    pub end_thickness: f32,
    /// Seconds a latched rope keeps its wave before it is drawn straight
    pub optimize_delay: f32,
    pub plank_width: f32,
    pub plank_thickness: f32,

    // Rope visual spring
    pub segments: usize,
    pub damper: f32,
    pub spring_strength: f32,
    /// Velocity kick given to the spring when a rope lands
    pub speed: f32,
    pub wave_count: f32,
    pub wave_height: f32,
}

impl Default for GrappleConfig {
    fn default() -> Self {
        Self {
            hook_distance: 50.0,
            minimum_rope_length: 1.0,
            release_impulse_factor: 0.05,
            hold_delay_to_swing: 0.2,
            player_retract_strength: 1000.0,
            retract_strength: 500.0,
            retract_damping: 50.0,
            latch_on_impulse: 200.0,
            right_rope_slack: 3.0,
            left_rope_color: (1.0, 0.0, 0.0),
            right_rope_color: (0.0, 0.0, 1.0),
            start_thickness: 0.02,
            end_thickness: 0.06,
            optimize_delay: 1.0,
            plank_width: 0.6,
            plank_thickness: 0.08,
            segments: 50,
            damper: 12.0,
            spring_strength: 800.0,
            speed: 12.0,
            wave_count: 5.0,
            wave_height: 4.0,
        }
    }
}

impl GrappleConfig {
    /// Parse a config from RON text.
    pub fn from_ron(contents: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(contents)
    }

    /// Load grapple config from the RON file, falling back to defaults.
    pub fn load() -> Self {
        let path = GRAPPLE_CONFIG_PATH;
        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_ron(&contents) {
                Ok(config) => {
                    info!("Loaded grapple config from {}", path);
                    config
                }
                Err(e) => {
                    error!("Failed to parse {}: {}. Using defaults.", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Could not read {}: {}. Using defaults.", path, e);
                Self::default()
            }
        }
    }

    pub fn rope_color(&self, right_hand: bool) -> Color {
        let (r, g, b) = if right_hand {
            self.right_rope_color
        } else {
            self.left_rope_color
        };
        Color::srgb(r, g, b)
    }
}

/// System to load grapple config at startup.
pub fn load_grapple_config(mut commands: Commands) {
    commands.insert_resource(GrappleConfig::load());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_in_defaults() {
        let config = GrappleConfig::from_ron("(hook_distance: 80.0, segments: 20)").unwrap();
        assert_eq!(config.hook_distance, 80.0);
        assert_eq!(config.segments, 20);
        assert_eq!(config.hold_delay_to_swing, GrappleConfig::default().hold_delay_to_swing);
    }

    #[test]
    fn shipped_config_parses() {
        let config = GrappleConfig::from_ron(include_str!("../../assets/data/config/grapple.ron"))
            .expect("shipped grapple.ron should parse");
        assert!(config.segments > 2);
        assert!(config.minimum_rope_length > 0.0);
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(GrappleConfig::from_ron("(hook_distance: \"far\")").is_err());
    }
}
