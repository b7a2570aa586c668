//! Topology expander.
//!
//! Instantiates every module required by a [`Params`] set, builds the
//! uplink/downlink flows of each user and bearer, derives the arcs and
//! finally runs conflict detection over the bearer-0 flows.
//!
//! Instantiation order is part of the output: labels are assigned from it.
//! The order is
//! 1. shared modules, then their replicas (`-c0`, `-c1`, ... per module),
//! 2. for each bearer, its two UE selectors (plus replicas on bearer 0)
//!    followed by the per-user modules of each served user (plus replicas
//!    on bearer 0).

use log::{debug, info};

use super::conflicts::detect_conflicts;
use super::flows::{bearer_module_name, flow_module_names, replica_name, user_module_name};
use super::graph::Graph;
use super::types::{Direction, Flow};
use super::weights::{ModuleKind, BEARER_KINDS, SHARED_KINDS, USER_KINDS};
use super::GenerationError;
use crate::config::Params;

/// Expand workload parameters into a complete pipeline graph
pub fn expand(params: &Params) -> Result<Graph, GenerationError> {
    info!(
        "Expanding pipeline: {} users, {} bearers, {} bearer-0 users, {} conflict replicas",
        params.user_num, params.bearer_num, params.bearer0_user, params.conflict_num
    );

    let mut graph = Graph::new();

    instantiate_modules(&mut graph, params);
    info!("Instantiated {} modules", graph.modules().len());

    let bearer0_flows = build_flows(&mut graph, params)?;
    info!(
        "Built {} flows ({} on bearer 0)",
        graph.flows().len(),
        bearer0_flows.len()
    );

    graph.link_flows();
    info!("Derived {} arcs", graph.arcs().len());

    graph.set_attribute("cpu_number", params.cpu_num.to_string());
    graph.set_attribute("cpu_capacity", format_capacity(params.cpu_capacity));

    let added = detect_conflicts(&mut graph, &bearer0_flows);
    info!("Detected {} conflict pairs", added);

    Ok(graph)
}

/// Instantiate a group of modules followed by `replicas` copies of each
fn instantiate_group(graph: &mut Graph, group: Vec<(String, ModuleKind)>, replicas: usize) {
    for (name, kind) in &group {
        graph.add_module(name.clone(), *kind);
    }
    for (name, kind) in &group {
        for conflict_id in 0..replicas {
            graph.add_module(replica_name(name, conflict_id), *kind);
        }
    }
}

fn instantiate_modules(graph: &mut Graph, params: &Params) {
    let shared = SHARED_KINDS
        .iter()
        .map(|kind| (kind.name().to_string(), *kind))
        .collect();
    instantiate_group(graph, shared, params.conflict_num);

    for bearer in 0..params.bearer_num {
        let replicas = params.copies_on_bearer(bearer) - 1;

        let selectors = BEARER_KINDS
            .iter()
            .map(|kind| (bearer_module_name(*kind, bearer), *kind))
            .collect();
        instantiate_group(graph, selectors, replicas);

        for user in 0..params.users_on_bearer(bearer) {
            let per_user = USER_KINDS
                .iter()
                .map(|kind| (user_module_name(*kind, user, bearer), *kind))
                .collect();
            instantiate_group(graph, per_user, replicas);
        }
        debug!("Bearer {}: {} modules instantiated so far", bearer, graph.modules().len());
    }
}

/// Build all flows and return the indices of bearer-0 flows in construction order
fn build_flows(graph: &mut Graph, params: &Params) -> Result<Vec<usize>, GenerationError> {
    let mut bearer0_flows = Vec::new();

    for bearer in 0..params.bearer_num {
        for user in 0..params.users_on_bearer(bearer) {
            for direction in Direction::ALL {
                let names = flow_module_names(direction, bearer, user, None);
                let primary = graph.add_flow(Flow::flow_name(direction, user, bearer, None), direction, &names)?;
                if bearer != 0 {
                    continue;
                }

                bearer0_flows.push(primary);
                for conflict_id in 0..params.conflict_num {
                    let names = flow_module_names(direction, bearer, user, Some(conflict_id));
                    let backup = graph.add_flow(
                        Flow::flow_name(direction, user, bearer, Some(conflict_id)),
                        direction,
                        &names,
                    )?;
                    bearer0_flows.push(backup);
                }
            }
        }
    }

    Ok(bearer0_flows)
}

/// CPU capacity is a float attribute; always print it with a decimal point
fn format_capacity(capacity: f64) -> String {
    if capacity.fract() == 0.0 {
        format!("{:.1}", capacity)
    } else {
        capacity.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(user_num: usize, bearer_num: usize, bearer0_user: usize, conflict_num: usize) -> Params {
        Params { user_num, bearer_num, bearer0_user, conflict_num, ..Params::default() }
    }

    fn expected_module_count(p: &Params) -> usize {
        let copies = |bearer| p.copies_on_bearer(bearer);
        let mut count = 12 * (1 + p.conflict_num);
        for bearer in 0..p.bearer_num {
            count += 2 * copies(bearer);
            count += 7 * copies(bearer) * p.users_on_bearer(bearer);
        }
        count
    }

    #[test]
    fn test_module_count() {
        for p in [
            params(1, 1, 1, 0),
            params(2, 2, 1, 0),
            params(3, 2, 2, 2),
            params(4, 3, 0, 1),
            params(2, 1, 9, 3),
        ] {
            let graph = expand(&p).unwrap();
            assert_eq!(graph.modules().len(), expected_module_count(&p), "params {:?}", p);
        }
    }

    #[test]
    fn test_instantiation_order() {
        let graph = expand(&params(1, 2, 1, 1)).unwrap();
        let names: Vec<&str> = graph.modules().iter().map(|m| m.name.as_str()).collect();

        assert_eq!(names[0], "mac_table");
        assert_eq!(names[11], "ip_checksum_ul");
        assert_eq!(names[12], "mac_table-c0");
        assert_eq!(names[23], "ip_checksum_ul-c0");
        assert_eq!(&names[24..28], &["dl_ue_selector_0", "ul_ue_selector_0", "dl_ue_selector_0-c0", "ul_ue_selector_0-c0"]);
        assert_eq!(names[28], "ul_user_bp_0_0");
        assert_eq!(names[34], "ether_encap_0_0");
        assert_eq!(names[35], "ul_user_bp_0_0-c0");
        assert_eq!(names[41], "ether_encap_0_0-c0");
        // Bearer 1 gets no replicas
        assert_eq!(&names[42..44], &["dl_ue_selector_1", "ul_ue_selector_1"]);
        assert_eq!(names[44], "ul_user_bp_0_1");
        assert_eq!(names.len(), 51);

        for (idx, module) in graph.modules().iter().enumerate() {
            assert_eq!(module.label, idx);
        }
    }

    #[test]
    fn test_replica_weights() {
        let graph = expand(&params(1, 1, 1, 2)).unwrap();
        assert_eq!(graph.module_by_name("dl_br_selector-c1").unwrap().weight, 20);
        assert_eq!(graph.module_by_name("setmd_ul_0_0-c0").unwrap().weight, 10);
        assert_eq!(graph.module_by_name("vxlan_decap").unwrap().weight, 10);
    }

    #[test]
    fn test_flow_order() {
        let graph = expand(&params(2, 2, 1, 1)).unwrap();
        let names: Vec<&str> = graph.flows().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["ul_0_0", "ul_0_0-c0", "dl_0_0", "dl_0_0-c0", "ul_0_1", "dl_0_1", "ul_1_1", "dl_1_1"]
        );
    }

    #[test]
    fn test_attributes() {
        let mut p = params(1, 1, 1, 0);
        p.cpu_num = 8;
        p.cpu_capacity = 12.5;
        let graph = expand(&p).unwrap();
        assert_eq!(graph.attributes()[0], ("cpu_number".to_string(), "8".to_string()));
        assert_eq!(graph.attributes()[1], ("cpu_capacity".to_string(), "12.5".to_string()));

        let graph = expand(&params(1, 1, 1, 0)).unwrap();
        assert_eq!(graph.attribute("cpu_capacity"), Some("25.0"));
    }

    #[test]
    fn test_empty_workloads() {
        for p in [params(0, 3, 1, 1), params(3, 0, 1, 1)] {
            let graph = expand(&p).unwrap();
            assert!(graph.flows().is_empty());
            assert!(graph.arcs().is_empty());
            assert!(graph.conflicts().is_empty());
            assert!(graph.modules().len() >= 24);
        }
    }

    #[test]
    fn test_successors_follow_flows() {
        let graph = expand(&params(1, 1, 1, 0)).unwrap();
        let mac_table = graph.module_by_name("mac_table").unwrap();
        let type_check = graph.module_by_name("type_check").unwrap();
        assert_eq!(mac_table.successors.iter().copied().collect::<Vec<_>>(), vec![type_check.label]);

        let dir_selector = graph.module_by_name("dir_selector").unwrap();
        assert_eq!(dir_selector.successors.len(), 2);
    }
}
