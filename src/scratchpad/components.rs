//! Collected nodes.

use bevy::prelude::*;
use serde::Deserialize;

/// A note the player can collect.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NodeData {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Only one copy can be in the scratchpad
    #[serde(default)]
    pub unique: bool,
}

/// Every node collected so far and whether the overlay is open.
#[derive(Resource, Debug, Default)]
pub struct Scratchpad {
    pub nodes: Vec<NodeData>,
    pub open: bool,
}

impl Scratchpad {
    /// Add a node. Returns false if it is unique and already collected.
    pub fn add_node(&mut self, node: NodeData) -> bool {
        if node.unique && self.nodes.contains(&node) {
            return false;
        }
        self.nodes.push(node);
        true
    }
}

/// Short notice shown next to the scratchpad when a node is added.
#[derive(Event, Debug, Clone)]
pub struct ScratchpadNoticeEvent(pub String);
