//! Graph container.
//!
//! Owns the module arena and everything derived from it: arcs, flows,
//! attributes and conflicts. Serialization lives in [`crate::lgf::writer`].

use std::collections::{BTreeSet, HashMap, HashSet};

use super::types::{Direction, Flow, Module};
use super::weights::ModuleKind;
use super::GenerationError;

/// A generated pipeline graph
#[derive(Debug, Clone, Default)]
pub struct Graph {
    modules: Vec<Module>,
    index: HashMap<String, usize>,
    arcs: Vec<(usize, usize)>,
    arc_set: HashSet<(usize, usize)>,
    attributes: Vec<(String, String)>,
    flows: Vec<Flow>,
    conflicts: BTreeSet<(usize, usize)>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Modules ordered by label
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn module(&self, label: usize) -> Option<&Module> {
        self.modules.get(label)
    }

    pub fn module_by_name(&self, name: &str) -> Option<&Module> {
        self.index.get(name).map(|&label| &self.modules[label])
    }

    /// Deduplicated arcs, in the order they were first seen
    pub fn arcs(&self) -> &[(usize, usize)] {
        &self.arcs
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Look up an attribute value by key
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn flows(&self) -> &[Flow] {
        &self.flows
    }

    pub fn flow_by_name(&self, name: &str) -> Option<&Flow> {
        self.flows.iter().find(|flow| flow.name == name)
    }

    /// All recorded conflict pairs `(module, conflicting module)`
    pub fn conflicts(&self) -> &BTreeSet<(usize, usize)> {
        &self.conflicts
    }

    /// Module names of a flow, head to tail
    pub fn flow_module_names<'a>(&'a self, flow: &'a Flow) -> impl Iterator<Item = &'a str> + 'a {
        flow.modules.iter().map(move |&label| self.modules[label].name.as_str())
    }

    /// Instantiate a module and return its label.
    ///
    /// The label is the current module count, so labels stay dense and follow
    /// instantiation order. Names must be unique.
    pub(crate) fn add_module(&mut self, name: String, kind: ModuleKind) -> usize {
        let label = self.modules.len();
        debug_assert!(!self.index.contains_key(&name), "duplicate module name {}", name);
        self.index.insert(name.clone(), label);
        self.modules.push(Module::new(name, label, kind));
        label
    }

    /// Resolve module names to labels and store the flow
    pub(crate) fn add_flow(
        &mut self,
        name: String,
        direction: Direction,
        module_names: &[String],
    ) -> Result<usize, GenerationError> {
        let modules = module_names
            .iter()
            .map(|module_name| {
                self.index.get(module_name).copied().ok_or_else(|| {
                    GenerationError::UnresolvedModuleReference {
                        name: module_name.clone(),
                        context: format!("flow {}", name),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.flows.push(Flow { name, direction, modules });
        Ok(self.flows.len() - 1)
    }

    /// Add `target` to the successors of `source`. Returns false if the arc already existed.
    pub(crate) fn add_arc(&mut self, source: usize, target: usize) -> bool {
        self.modules[source].successors.insert(target);
        if self.arc_set.insert((source, target)) {
            self.arcs.push((source, target));
            true
        } else {
            false
        }
    }

    /// Derive arcs from consecutive modules of every flow
    pub(crate) fn link_flows(&mut self) {
        let hops: Vec<(usize, usize)> = self.flows.iter().flat_map(|flow| flow.hops()).collect();
        for (source, target) in hops {
            self.add_arc(source, target);
        }
    }

    pub(crate) fn set_attribute(&mut self, key: &str, value: String) {
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((key.to_string(), value)),
        }
    }

    /// Record that `module` must not share a CPU with `other`.
    ///
    /// Only `module`'s conflict set is updated.
    pub(crate) fn add_conflict(&mut self, module: usize, other: usize) -> bool {
        self.modules[module].conflicts.insert(other);
        self.conflicts.insert((module, other))
    }
}
