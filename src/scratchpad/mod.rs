//! Scratchpad module - collected nodes and the overlay that lists them.

mod components;
mod plugin;

pub use components::{NodeData, Scratchpad, ScratchpadNoticeEvent};
pub use plugin::ScratchpadPlugin;
