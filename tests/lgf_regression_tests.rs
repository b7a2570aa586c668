#[cfg(test)]
mod lgf_regression_tests {
    use std::collections::{BTreeSet, HashSet};
    use std::io::Write;
    use tempfile::NamedTempFile;

    use mgwgen::config::Params;
    use mgwgen::lgf::{parse_lgf, parse_lgf_file, validate_document};
    use mgwgen::pipeline::{expand, Graph};
    use mgwgen::topology::{from_topology, load_topology, TopologyEntry};

    fn params(user_num: usize, bearer_num: usize, bearer0_user: usize, conflict_num: usize) -> Params {
        Params { user_num, bearer_num, bearer0_user, conflict_num, ..Params::default() }
    }

    fn expected_module_count(p: &Params) -> usize {
        let copies = 1 + p.conflict_num;
        let mut count = 12 * copies;
        for bearer in 0..p.bearer_num {
            let per_bearer = if bearer == 0 { copies } else { 1 };
            let users = if bearer == 0 { p.user_num.min(p.bearer0_user) } else { p.user_num };
            count += 2 * per_bearer + 7 * per_bearer * users;
        }
        count
    }

    fn flow_names(graph: &Graph, flow: &str) -> Vec<String> {
        let flow = graph.flow_by_name(flow).unwrap();
        graph.flow_module_names(flow).map(str::to_string).collect()
    }

    #[test]
    fn test_single_user_single_bearer() {
        let graph = expand(&params(1, 1, 1, 0)).unwrap();

        let flows: Vec<&str> = graph.flows().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(flows.len(), 2);
        assert!(flows.contains(&"ul_0_0"));
        assert!(flows.contains(&"dl_0_0"));

        assert_eq!(
            flow_names(&graph, "ul_0_0"),
            vec![
                "mac_table",
                "type_check",
                "dir_selector",
                "vxlan_decap",
                "ul_br_selector",
                "ul_ue_selector_0",
                "ul_user_bp_0_0",
                "setmd_ul_0_0",
                "update_ttl",
                "L3",
                "update_mac_ul",
                "ip_checksum_ul",
            ]
        );
        assert_eq!(
            flow_names(&graph, "dl_0_0"),
            vec![
                "mac_table",
                "type_check",
                "dir_selector",
                "dl_br_selector",
                "dl_ue_selector_0",
                "dl_user_bp_0_0",
                "setmd_dl_0_0",
                "vxlan_encap_0_0",
                "ip_encap_0_0",
                "ether_encap_0_0",
                "update_ttl",
                "L3",
                "update_mac_dl",
                "ip_checksum_dl",
            ]
        );
        assert!(graph.conflicts().is_empty());
    }

    #[test]
    fn test_module_count_formula() {
        for p in [
            params(1, 1, 1, 0),
            params(2, 2, 1, 0),
            params(3, 2, 2, 1),
            params(2, 3, 5, 2),
            params(4, 1, 0, 3),
            params(0, 2, 1, 1),
            params(2, 0, 1, 1),
        ] {
            let graph = expand(&p).unwrap();
            assert_eq!(graph.modules().len(), expected_module_count(&p), "params {:?}", p);
        }
    }

    #[test]
    fn test_labels_are_dense_permutation() {
        let graph = expand(&params(3, 2, 2, 2)).unwrap();
        let labels: Vec<usize> = graph.modules().iter().map(|m| m.label).collect();
        let expected: Vec<usize> = (0..graph.modules().len()).collect();
        assert_eq!(labels, expected);

        let names: HashSet<&str> = graph.modules().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names.len(), graph.modules().len());
    }

    #[test]
    fn test_no_duplicate_arcs() {
        let graph = expand(&params(4, 3, 2, 1)).unwrap();
        let unique: HashSet<(usize, usize)> = graph.arcs().iter().copied().collect();
        assert_eq!(unique.len(), graph.arcs().len());

        // Every hop of every flow is backed by an arc
        for flow in graph.flows() {
            for hop in flow.hops() {
                assert!(unique.contains(&hop), "missing arc {:?} of {}", hop, flow.name);
            }
        }
    }

    #[test]
    fn test_no_self_conflicts() {
        let graph = expand(&params(2, 2, 2, 2)).unwrap();
        assert!(!graph.conflicts().is_empty());
        for (module, other) in graph.conflicts() {
            assert_ne!(module, other);
        }
        for module in graph.modules() {
            assert!(!module.conflicts.contains(&module.label));
        }
    }

    #[test]
    fn test_bearer0_without_users() {
        let graph = expand(&params(2, 2, 0, 0)).unwrap();

        assert!(graph.module_by_name("dl_ue_selector_0").is_some());
        assert!(graph.module_by_name("ul_ue_selector_0").is_some());
        assert!(graph.module_by_name("dl_user_bp_0_0").is_none());
        assert!(graph.module_by_name("dl_user_bp_0_1").is_some());

        assert!(graph.flows().iter().all(|f| !f.name.ends_with("_0")));
        assert_eq!(graph.flows().len(), 4);
        assert!(graph.conflicts().is_empty());
    }

    #[test]
    fn test_no_replicas_without_conflicts() {
        let graph = expand(&params(3, 3, 2, 0)).unwrap();
        assert!(graph.modules().iter().all(|m| !m.name.contains("-c")));
        assert!(graph.flows().iter().all(|f| !f.name.contains("-c")));
        assert!(graph.conflicts().is_empty());

        let lgf = graph.to_lgf();
        let conflicts = lgf.split("@conflicts\n").nth(1).unwrap();
        assert!(conflicts.trim().is_empty());
    }

    #[test]
    fn test_backup_flows_conflict_with_primary() {
        let graph = expand(&params(1, 1, 1, 2)).unwrap();

        let uplink: Vec<&str> = graph
            .flows()
            .iter()
            .filter(|f| f.name.starts_with("ul"))
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(uplink, vec!["ul_0_0", "ul_0_0-c0", "ul_0_0-c1"]);

        let primary = graph.flow_by_name("ul_0_0").unwrap();
        let first = graph.flow_by_name("ul_0_0-c0").unwrap();
        let second = graph.flow_by_name("ul_0_0-c1").unwrap();

        for m in &primary.modules {
            for n in first.modules.iter().chain(&second.modules) {
                assert!(graph.conflicts().contains(&(*m, *n)));
                assert!(graph.modules()[*m].conflicts.contains(n));
                // Conflicts are recorded on the earlier flow only
                assert!(!graph.modules()[*n].conflicts.contains(m));
            }
        }
        for m in &first.modules {
            for n in &second.modules {
                assert!(graph.conflicts().contains(&(*m, *n)));
            }
        }

        // 12 modules per uplink flow, 14 per downlink flow, 3 flow pairs each
        assert_eq!(graph.conflicts().len(), 3 * 12 * 12 + 3 * 14 * 14);
    }

    #[test]
    fn test_uplink_and_downlink_never_conflict() {
        let graph = expand(&params(1, 1, 1, 1)).unwrap();
        let uplink_only: BTreeSet<usize> = graph
            .modules()
            .iter()
            .filter(|m| m.name.contains("ul_") || m.name.contains("vxlan_decap"))
            .map(|m| m.label)
            .collect();
        let downlink_only: BTreeSet<usize> = graph
            .modules()
            .iter()
            .filter(|m| m.name.starts_with("dl_") || m.name.contains("encap_"))
            .map(|m| m.label)
            .collect();

        for (m, n) in graph.conflicts() {
            assert!(!(uplink_only.contains(m) && downlink_only.contains(n)));
            assert!(!(downlink_only.contains(m) && uplink_only.contains(n)));
        }
    }

    #[test]
    fn test_round_trip_nodes_and_arcs() {
        let graph = expand(&params(2, 2, 1, 1)).unwrap();
        let doc = parse_lgf(&graph.to_lgf()).unwrap();

        let written: BTreeSet<(u32, String)> = graph
            .modules()
            .iter()
            .map(|m| (m.label as u32, m.name.clone()))
            .collect();
        let parsed: BTreeSet<(u32, String)> = doc
            .nodes
            .iter()
            .map(|n| (n.label, n.name.clone().unwrap()))
            .collect();
        assert_eq!(written, parsed);

        let written_arcs: BTreeSet<(u32, u32)> =
            graph.arcs().iter().map(|(s, t)| (*s as u32, *t as u32)).collect();
        let parsed_arcs: BTreeSet<(u32, u32)> = doc.arc_pairs().into_iter().collect();
        assert_eq!(written_arcs, parsed_arcs);

        assert_eq!(doc.flows.len(), graph.flows().len());
        assert_eq!(doc.conflicts.len(), graph.conflicts().len());
        assert_eq!(doc.attribute("cpu_number"), Some("5"));
        assert_eq!(doc.attribute("cpu_capacity"), Some("25.0"));
    }

    #[test]
    fn test_generated_file_validates() {
        let graph = expand(&params(3, 2, 2, 1)).unwrap();
        let file = NamedTempFile::new().unwrap();
        graph.write_lgf(file.path()).unwrap();

        let doc = parse_lgf_file(file.path()).unwrap();
        validate_document(&doc).unwrap();

        let summary = doc.summary();
        assert_eq!(summary.nodes, graph.modules().len());
        assert_eq!(summary.arcs, graph.arcs().len());
        let total: u32 = graph.modules().iter().map(|m| m.weight).sum();
        assert_eq!(summary.total_weight, total as f64);
    }

    #[test]
    fn test_empty_workload_is_valid() {
        let graph = expand(&params(0, 0, 0, 0)).unwrap();
        assert_eq!(graph.modules().len(), 12);
        assert!(graph.arcs().is_empty());
        assert!(graph.flows().is_empty());

        let doc = parse_lgf(&graph.to_lgf()).unwrap();
        validate_document(&doc).unwrap();
        assert_eq!(doc.nodes.len(), 12);
    }

    #[test]
    fn test_topology_conversion() {
        let entries = vec![
            TopologyEntry::new("mac_table", &["type_check"]),
            TopologyEntry::new("type_check", &["dir_selector"]),
            TopologyEntry::new("dir_selector", &["dl_br_selector", "vxlan_decap"]),
            TopologyEntry::new("dl_br_selector", &[]),
            TopologyEntry::new("vxlan_decap", &[]),
        ];
        let topology = from_topology(&entries).unwrap();
        assert_eq!(topology.label_of("vxlan_decap"), Some(4));
        assert_eq!(topology.arcs, vec![(0, 1), (1, 2), (2, 3), (2, 4)]);

        let doc = parse_lgf(&topology.to_lgf()).unwrap();
        validate_document(&doc).unwrap();
        assert_eq!(doc.nodes.len(), 5);
        assert_eq!(doc.arc_pairs(), vec![(0, 1), (1, 2), (2, 3), (2, 4)]);
        assert!(doc.nodes.iter().all(|n| n.weight.is_none()));
    }

    #[test]
    fn test_topology_file_conversion() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
mac_table:
  successors: [type_check]
type_check:
  successors: [L3]
L3:
"#
        )
        .unwrap();

        let entries = load_topology(file.path()).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["mac_table", "type_check", "L3"]);

        let topology = from_topology(&entries).unwrap();
        assert_eq!(topology.arcs, vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn test_topology_unknown_successor() {
        let entries = vec![TopologyEntry::new("mac_table", &["firewall"])];
        assert!(from_topology(&entries).is_err());
    }
}
