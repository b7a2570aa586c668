//! LGF serialization.
//!
//! Layout of a generated file:
//!
//! ```text
//! @nodes
//! label	name	weight
//! 0	mac_table	1
//!
//! @arcs
//! 		label
//! 0	1	0
//!
//! @attributes
//! cpu_number	5
//!
//! @flows
//! ul_0_0	mac_table,type_check,...
//!
//! @conflicts
//! 28	35
//! ```

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use log::info;

use crate::pipeline::Graph;
use crate::topology::TopologyGraph;

/// Accumulates sections separated by a blank line
#[derive(Default)]
struct LgfWriter {
    out: String,
}

impl LgfWriter {
    fn section(&mut self, name: &str) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        self.out.push('@');
        self.out.push_str(name);
        self.out.push('\n');
    }

    fn row<I, T>(&mut self, cells: I)
    where
        I: IntoIterator<Item = T>,
        T: std::fmt::Display,
    {
        for (idx, cell) in cells.into_iter().enumerate() {
            if idx > 0 {
                self.out.push('\t');
            }
            // Writing into a String cannot fail
            let _ = write!(self.out, "{}", cell);
        }
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn arcs(&mut self, arcs: &[(usize, usize)]) {
        self.section("arcs");
        self.out.push_str("\t\tlabel\n");
        for (label, (source, target)) in arcs.iter().enumerate() {
            self.row([source, target, &label]);
        }
    }

    fn finish(self) -> String {
        self.out
    }
}

/// Render a generated pipeline graph as LGF text
pub fn render_graph(graph: &Graph) -> String {
    let mut writer = LgfWriter::default();

    writer.section("nodes");
    writer.row(["label", "name", "weight"]);
    for module in graph.modules() {
        writer.row([module.label.to_string(), module.name.clone(), module.weight.to_string()]);
    }

    writer.arcs(graph.arcs());

    writer.section("attributes");
    for (key, value) in graph.attributes() {
        writer.row([key, value]);
    }

    writer.section("flows");
    for flow in graph.flows() {
        let modules = graph.flow_module_names(flow).collect::<Vec<_>>().join(",");
        writer.row([flow.name.as_str(), modules.as_str()]);
        writer.blank();
    }

    writer.section("conflicts");
    for module in graph.modules() {
        for other in &module.conflicts {
            writer.row([module.label, *other]);
        }
    }

    writer.finish()
}

/// Render a converted live topology as LGF text (nodes and arcs only)
pub fn render_topology(topology: &TopologyGraph) -> String {
    let mut writer = LgfWriter::default();

    writer.section("nodes");
    writer.row(["label", "name"]);
    for (label, name) in &topology.nodes {
        writer.row([label.to_string(), name.clone()]);
    }

    writer.arcs(&topology.arcs);

    writer.finish()
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .wrap_err_with(|| format!("Failed to create directory '{}'", parent.display()))?;
        }
    }
    fs::write(path, content).wrap_err_with(|| format!("Failed to write LGF file '{}'", path.display()))?;
    info!("Wrote LGF to {}", path.display());
    Ok(())
}

impl Graph {
    /// Serialize to LGF text
    pub fn to_lgf(&self) -> String {
        render_graph(self)
    }

    /// Serialize to an LGF file, creating parent directories as needed
    pub fn write_lgf(&self, path: impl AsRef<Path>) -> Result<()> {
        write_file(path.as_ref(), &self.to_lgf())
    }
}

impl TopologyGraph {
    pub fn to_lgf(&self) -> String {
        render_topology(self)
    }

    pub fn write_lgf(&self, path: impl AsRef<Path>) -> Result<()> {
        write_file(path.as_ref(), &self.to_lgf())
    }
}
