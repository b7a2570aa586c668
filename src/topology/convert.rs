//! Topology dump loading and conversion.
//!
//! A dump is a YAML (or JSON) mapping in module order:
//!
//! ```yaml
//! port_inc:
//!   successors: [mac_table]
//! mac_table:
//!   successors: [type_check]
//! type_check:
//!   successors: []
//! ```
//!
//! A list of `{name, successors}` entries is accepted as well.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use color_eyre::eyre::{eyre, Result, WrapErr};
use log::{info, warn};
use serde::Deserialize;
use serde_yaml::Value;

use super::types::{TopologyEntry, TopologyGraph};
use crate::pipeline::GenerationError;

#[derive(Debug, Default, Deserialize)]
struct ModuleInfo {
    #[serde(default)]
    successors: Vec<String>,
}

/// Convert a topology into labelled nodes and arcs
///
/// Labels follow entry order. Arcs follow entry order and, within an entry,
/// successor order; repeated gates to the same target are kept.
///
/// # Errors
/// `UnresolvedModuleReference` when a successor is not itself an entry
pub fn from_topology(entries: &[TopologyEntry]) -> Result<TopologyGraph, GenerationError> {
    let mut labels: HashMap<&str, usize> = HashMap::new();
    let mut graph = TopologyGraph::default();

    for entry in entries {
        if labels.contains_key(entry.name.as_str()) {
            warn!("Duplicate module '{}' in topology, merging its successors", entry.name);
            continue;
        }
        let label = graph.nodes.len();
        labels.insert(entry.name.as_str(), label);
        graph.nodes.push((label, entry.name.clone()));
    }

    for entry in entries {
        let source = labels[entry.name.as_str()];
        for successor in &entry.successors {
            let target = labels.get(successor.as_str()).copied().ok_or_else(|| {
                GenerationError::UnresolvedModuleReference {
                    name: successor.clone(),
                    context: format!("successors of {}", entry.name),
                }
            })?;
            graph.arcs.push((source, target));
        }
    }

    info!("Converted topology: {} modules, {} arcs", graph.nodes.len(), graph.arcs.len());
    Ok(graph)
}

fn entry_from_pair(key: Value, value: Value) -> Result<TopologyEntry> {
    let name = match key {
        Value::String(name) => name,
        other => return Err(eyre!("Module names must be strings, found {:?}", other)),
    };
    let info: ModuleInfo = match value {
        Value::Null => ModuleInfo::default(),
        other => serde_yaml::from_value(other).wrap_err_with(|| format!("Invalid entry for module '{}'", name))?,
    };
    Ok(TopologyEntry { name, successors: info.successors })
}

/// Parse topology dump content, keeping the module order of the document
pub fn parse_topology(content: &str) -> Result<Vec<TopologyEntry>> {
    let value: Value = serde_yaml::from_str(content)?;
    match value {
        Value::Mapping(mapping) => mapping.into_iter().map(|(k, v)| entry_from_pair(k, v)).collect(),
        Value::Sequence(seq) => Ok(serde_yaml::from_value(Value::Sequence(seq))?),
        Value::Null => Ok(Vec::new()),
        other => Err(eyre!("Topology must be a mapping or a list, found {:?}", other)),
    }
}

/// Load a topology dump from a YAML or JSON file
pub fn load_topology(path: &Path) -> Result<Vec<TopologyEntry>> {
    info!("Loading topology from: {:?}", path);

    let content =
        fs::read_to_string(path).wrap_err_with(|| format!("Failed to read topology '{}'", path.display()))?;
    parse_topology(&content).wrap_err_with(|| format!("Failed to parse topology '{}'", path.display()))
}
