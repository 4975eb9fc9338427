//! UI module - crosshair, info popups and the scratchpad overlay.

mod hud;
mod panel;
mod plugin;
mod popup;

pub use plugin::UiPlugin;
