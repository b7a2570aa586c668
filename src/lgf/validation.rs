//! Consistency checks for parsed LGF documents.

use std::collections::{HashMap, HashSet};

use super::parser::LgfDocument;

/// Validate the cross references of an LGF document
///
/// Checks for:
/// - Duplicate node labels and names
/// - Arcs and conflicts referencing non-existent nodes
/// - Self conflicts
/// - Flows referencing unknown module names
/// - Flows stepping between modules that have no arc
///
/// # Returns
/// * `Ok(())` if validation succeeds
/// * `Err(String)` describing the first problem found
pub fn validate_document(doc: &LgfDocument) -> Result<(), String> {
    let mut labels = HashSet::new();
    let mut names: HashMap<&str, u32> = HashMap::new();
    for node in &doc.nodes {
        if !labels.insert(node.label) {
            return Err(format!("Duplicate node label: {}", node.label));
        }
        if let Some(name) = node.name.as_deref() {
            if names.insert(name, node.label).is_some() {
                return Err(format!("Duplicate node name: {}", name));
            }
        }
    }

    for arc in &doc.arcs {
        if !labels.contains(&arc.source) {
            return Err(format!("Arc references non-existent source node: {}", arc.source));
        }
        if !labels.contains(&arc.target) {
            return Err(format!("Arc references non-existent target node: {}", arc.target));
        }
    }

    for &(first, second) in &doc.conflicts {
        if first == second {
            return Err(format!("Node {} conflicts with itself", first));
        }
        for label in [first, second] {
            if !labels.contains(&label) {
                return Err(format!("Conflict references non-existent node: {}", label));
            }
        }
    }

    let arcs: HashSet<(u32, u32)> = doc.arc_pairs().into_iter().collect();
    for flow in &doc.flows {
        if flow.modules.is_empty() {
            log::warn!("Flow {} has no modules", flow.name);
        }

        let mut path = Vec::with_capacity(flow.modules.len());
        for module in &flow.modules {
            let label = names
                .get(module.as_str())
                .ok_or_else(|| format!("Flow {} references unknown module: {}", flow.name, module))?;
            path.push(*label);
        }

        for hop in path.windows(2) {
            if !arcs.contains(&(hop[0], hop[1])) {
                return Err(format!(
                    "Flow {} steps from node {} to node {} without an arc",
                    flow.name, hop[0], hop[1]
                ));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lgf::parser::parse_lgf;

    const VALID: &str = "@nodes\nlabel\tname\tweight\n0\ta\t1\n1\tb\t1\n2\tc\t1\n\n\
                         @arcs\n\t\tlabel\n0\t1\t0\n1\t2\t1\n\n\
                         @flows\nf\ta,b,c\n\n\
                         @conflicts\n0\t2\n";

    #[test]
    fn test_valid_document() {
        let doc = parse_lgf(VALID).unwrap();
        assert!(validate_document(&doc).is_ok());
    }

    #[test]
    fn test_duplicate_label() {
        let doc = parse_lgf("@nodes\nlabel\tname\n0\ta\n0\tb\n").unwrap();
        assert!(validate_document(&doc).unwrap_err().contains("Duplicate node label"));
    }

    #[test]
    fn test_dangling_references() {
        let mut doc = parse_lgf(VALID).unwrap();
        doc.arcs[0].target = 9;
        assert!(validate_document(&doc).is_err());

        let mut doc = parse_lgf(VALID).unwrap();
        doc.conflicts.push((1, 7));
        assert!(validate_document(&doc).is_err());

        let mut doc = parse_lgf(VALID).unwrap();
        doc.flows[0].modules.push("d".to_string());
        assert!(validate_document(&doc).unwrap_err().contains("unknown module"));
    }

    #[test]
    fn test_self_conflict() {
        let mut doc = parse_lgf(VALID).unwrap();
        doc.conflicts.push((1, 1));
        assert!(validate_document(&doc).unwrap_err().contains("conflicts with itself"));
    }

    #[test]
    fn test_flow_without_arc() {
        let mut doc = parse_lgf(VALID).unwrap();
        doc.flows[0].modules = vec!["a".to_string(), "c".to_string()];
        assert!(validate_document(&doc).unwrap_err().contains("without an arc"));
    }
}
