//! Mobile gateway pipeline model.
//!
//! This module turns workload parameters into the module/flow graph of a
//! mobile gateway pipeline, including the conflict relation used to keep
//! fault-tolerance replicas on separate CPUs.

pub mod conflicts;
pub mod expander;
pub mod flows;
pub mod graph;
pub mod types;
pub mod weights;

// Re-export key types and functions for easier access
pub use conflicts::{conflict_pairs, detect_conflicts};
pub use expander::expand;
pub use flows::flow_module_names;
pub use graph::Graph;
pub use types::{Direction, Flow, Module};
pub use weights::{canonical_kind, weight_of, ModuleKind};

/// Errors raised while generating a pipeline graph.
///
/// All of these indicate an inconsistency in the generator itself or a
/// caller contract violation. Generation is aborted on the first one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("Unknown module kind: {0}")]
    UnknownModuleKind(String),
    #[error("Invalid flow direction '{0}', expected 'u' or 'd'")]
    InvalidDirection(String),
    #[error("Unresolved module reference '{name}' in {context}")]
    UnresolvedModuleReference { name: String, context: String },
}
