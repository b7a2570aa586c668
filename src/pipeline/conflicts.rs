//! Conflict detection over bearer-0 flows.
//!
//! Bearer-0 flows are replicated so that the service survives CPU failures.
//! A module of one bearer-0 flow must therefore not share a CPU with any
//! module of a later bearer-0 flow of the same direction.
//!
//! The relation is recorded one way only: for flows `F` before `G`, each
//! module of `F` gains the modules of `G` as conflicts, but not the reverse.
//! Downstream tooling reads the `@conflicts` section in exactly this form.

use log::debug;
use rayon::prelude::*;

use super::graph::Graph;
use super::types::Flow;

/// Compute conflict pairs `(module, conflicting module)` between flows.
///
/// `flows` must be in construction order. Each flow is compared with every
/// later flow of the same direction; pairs of identical labels are skipped.
/// The per-flow work runs in parallel but the result is ordered exactly as a
/// sequential walk would produce it, duplicates included.
pub fn conflict_pairs(flows: &[&Flow]) -> Vec<(usize, usize)> {
    let per_flow: Vec<Vec<(usize, usize)>> = (0..flows.len())
        .into_par_iter()
        .map(|idx| {
            let current = flows[idx];
            let others: Vec<&Flow> = flows[idx + 1..]
                .iter()
                .copied()
                .filter(|other| other.direction == current.direction)
                .collect();

            let mut pairs = Vec::new();
            for &module in &current.modules {
                for other in &others {
                    pairs.extend(
                        other
                            .modules
                            .iter()
                            .filter(|&&other_module| other_module != module)
                            .map(|&other_module| (module, other_module)),
                    );
                }
            }
            pairs
        })
        .collect();

    per_flow.into_iter().flatten().collect()
}

/// Record conflicts between the given flows of `graph`.
///
/// # Arguments
/// * `graph` - Graph holding the flows; module conflict sets are updated in place
/// * `flow_indices` - Indices into `graph.flows()`, in construction order
///
/// # Returns
/// The number of distinct conflict pairs added
pub fn detect_conflicts(graph: &mut Graph, flow_indices: &[usize]) -> usize {
    let pairs = {
        let flows: Vec<&Flow> = flow_indices.iter().map(|&idx| &graph.flows()[idx]).collect();
        conflict_pairs(&flows)
    };
    debug!("Comparing {} flows yielded {} raw conflict pairs", flow_indices.len(), pairs.len());

    pairs
        .into_iter()
        .filter(|&(module, other)| graph.add_conflict(module, other))
        .count()
}
