//! Pipeline entity types.
//!
//! Modules live in an arena owned by [`Graph`](super::graph::Graph) and are
//! addressed by their label. Flows, successor sets and conflict sets only
//! hold labels, never references.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::weights::ModuleKind;
use super::GenerationError;

/// Traffic direction of a flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Uplink, user equipment towards the core
    Up,
    /// Downlink, core towards user equipment
    Down,
}

impl Direction {
    /// Both directions, uplink first
    pub const ALL: [Direction; 2] = [Direction::Up, Direction::Down];

    /// Single-letter code used in flow names (`u` / `d`)
    pub fn code(self) -> char {
        match self {
            Direction::Up => 'u',
            Direction::Down => 'd',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}l", self.code())
    }
}

impl FromStr for Direction {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "u" | "up" | "ul" => Ok(Direction::Up),
            "d" | "down" | "dl" => Ok(Direction::Down),
            _ => Err(GenerationError::InvalidDirection(s.to_string())),
        }
    }
}

/// A packet processing module instance
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub name: String,
    /// Instantiation order index, also the node id in the output graph
    pub label: usize,
    pub kind: ModuleKind,
    pub weight: u32,
    /// Labels of modules reachable through a direct arc
    pub successors: BTreeSet<usize>,
    /// Labels of modules this one must not share a CPU with
    pub conflicts: BTreeSet<usize>,
}

impl Module {
    pub fn new(name: impl Into<String>, label: usize, kind: ModuleKind) -> Self {
        Self {
            name: name.into(),
            label,
            kind,
            weight: kind.weight(),
            successors: BTreeSet::new(),
            conflicts: BTreeSet::new(),
        }
    }

    /// True for fault-tolerance replicas (`-c{n}` suffix)
    pub fn is_replica(&self) -> bool {
        self.name.contains("-c")
    }
}

/// An end-to-end packet path through the pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct Flow {
    pub name: String,
    pub direction: Direction,
    /// Module labels, head to tail
    pub modules: Vec<usize>,
}

impl Flow {
    /// Name of a flow: `{u|d}l_{user}_{bearer}`, plus `-c{id}` for backups
    pub fn flow_name(direction: Direction, user: usize, bearer: usize, conflict_id: Option<usize>) -> String {
        match conflict_id {
            Some(id) => format!("{}_{}_{}-c{}", direction, user, bearer, id),
            None => format!("{}_{}_{}", direction, user, bearer),
        }
    }

    /// Consecutive (source, target) label pairs along the path
    pub fn hops(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.modules.windows(2).map(|pair| (pair[0], pair[1]))
    }
}
