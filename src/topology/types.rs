//! Topology type definitions.

use serde::{Deserialize, Serialize};

/// One module of a topology dump and the modules its output gates feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyEntry {
    pub name: String,
    #[serde(default)]
    pub successors: Vec<String>,
}

impl TopologyEntry {
    pub fn new(name: impl Into<String>, successors: &[&str]) -> Self {
        Self {
            name: name.into(),
            successors: successors.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Labelled graph converted from a topology dump.
///
/// Carries no weights, flows or conflicts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopologyGraph {
    /// (label, name), labels assigned in dump order
    pub nodes: Vec<(usize, String)>,
    /// (source label, target label), one per output gate
    pub arcs: Vec<(usize, usize)>,
}

impl TopologyGraph {
    /// Label of the node with the given name
    pub fn label_of(&self, name: &str) -> Option<usize> {
        self.nodes
            .iter()
            .find(|(_, node)| node == name)
            .map(|(label, _)| *label)
    }
}
