//! Grapple module - two-handed grappling hooks with swinging, latching
//! and rope cutting.

mod components;
mod config;
mod plugin;
mod rope;
mod spring;
mod systems;

pub use components::{GrappleState, Rope, RopeCollider, RopePhase};
pub use config::GrappleConfig;
pub use plugin::GrapplePlugin;
pub use spring::Spring;
