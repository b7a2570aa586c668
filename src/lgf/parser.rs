use std::collections::HashMap;
use std::fs;
use std::path::Path;

use color_eyre::eyre::{eyre, Result, WrapErr};
use serde::Serialize;

/// A node row of the `@nodes` section
#[derive(Debug, Clone, PartialEq)]
pub struct LgfNode {
    pub label: u32,
    pub name: Option<String>,
    pub weight: Option<f64>,
    /// Any other node map columns
    pub attributes: HashMap<String, String>,
}

/// A row of the `@arcs` section
#[derive(Debug, Clone, PartialEq)]
pub struct LgfArc {
    pub source: u32,
    pub target: u32,
    pub label: Option<u32>,
}

/// A row of the `@flows` section
#[derive(Debug, Clone, PartialEq)]
pub struct LgfFlow {
    pub name: String,
    pub modules: Vec<String>,
}

/// Contents of an LGF file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LgfDocument {
    pub nodes: Vec<LgfNode>,
    pub arcs: Vec<LgfArc>,
    pub attributes: Vec<(String, String)>,
    pub flows: Vec<LgfFlow>,
    pub conflicts: Vec<(u32, u32)>,
}

/// Section sizes and attributes of a document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LgfSummary {
    pub nodes: usize,
    pub arcs: usize,
    pub flows: usize,
    pub conflicts: usize,
    pub total_weight: f64,
    pub attributes: Vec<(String, String)>,
}

impl LgfDocument {
    pub fn summary(&self) -> LgfSummary {
        LgfSummary {
            nodes: self.nodes.len(),
            arcs: self.arcs.len(),
            flows: self.flows.len(),
            conflicts: self.conflicts.len(),
            total_weight: self.nodes.iter().filter_map(|node| node.weight).sum(),
            attributes: self.attributes.clone(),
        }
    }

    /// Look up an attribute value by key
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Find a node by its name
    pub fn node_by_name(&self, name: &str) -> Option<&LgfNode> {
        self.nodes.iter().find(|node| node.name.as_deref() == Some(name))
    }

    /// (source, target) pairs of all arcs
    pub fn arc_pairs(&self) -> Vec<(u32, u32)> {
        self.arcs.iter().map(|arc| (arc.source, arc.target)).collect()
    }
}

/// Split a line into tokens.
///
/// Tokens are separated by whitespace; a token may be a double-quoted string
/// with `\"`, `\\`, `\t` and `\n` escapes.
fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&ch) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        let mut token = String::new();
        if ch == '"' {
            chars.next(); // Skip opening quote
            let mut closed = false;
            while let Some(ch) = chars.next() {
                match ch {
                    '"' => {
                        closed = true;
                        break;
                    }
                    '\\' => match chars.next() {
                        Some('n') => token.push('\n'),
                        Some('t') => token.push('\t'),
                        Some('\\') => token.push('\\'),
                        Some('"') => token.push('"'),
                        Some(other) => {
                            token.push('\\');
                            token.push(other);
                        }
                        None => break,
                    },
                    _ => token.push(ch),
                }
            }
            if !closed {
                return Err(eyre!("Unterminated string literal"));
            }
        } else {
            while let Some(&ch) = chars.peek() {
                if ch.is_whitespace() {
                    break;
                }
                token.push(ch);
                chars.next();
            }
        }
        tokens.push(token);
    }

    Ok(tokens)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    Nodes,
    Arcs,
    Attributes,
    Flows,
    Conflicts,
    Unknown,
}

impl Section {
    fn from_name(name: &str) -> Self {
        match name {
            "nodes" => Section::Nodes,
            "arcs" => Section::Arcs,
            "attributes" => Section::Attributes,
            "flows" => Section::Flows,
            "conflicts" => Section::Conflicts,
            _ => Section::Unknown,
        }
    }

    /// Sections starting with a column header line
    fn has_header(self) -> bool {
        matches!(self, Section::Nodes | Section::Arcs)
    }
}

/// Line-oriented LGF parser
struct Parser {
    doc: LgfDocument,
    section: Option<Section>,
    columns: Option<Vec<String>>,
    line_no: usize,
}

impl Parser {
    fn new() -> Self {
        Self { doc: LgfDocument::default(), section: None, columns: None, line_no: 0 }
    }

    fn parse_u32(&self, value: &str, what: &str) -> Result<u32> {
        value
            .parse::<u32>()
            .map_err(|_| eyre!("Line {}: invalid {} '{}'", self.line_no, what, value))
    }

    fn start_section(&mut self, line: &str) -> Result<()> {
        let name = line[1..]
            .split_whitespace()
            .next()
            .ok_or_else(|| eyre!("Line {}: missing section name", self.line_no))?;
        let section = Section::from_name(name);
        if section == Section::Unknown {
            log::warn!("Skipping unknown LGF section '@{}' at line {}", name, self.line_no);
        }
        self.section = Some(section);
        self.columns = None;
        Ok(())
    }

    fn parse_line(&mut self, line: &str) -> Result<()> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(());
        }
        if trimmed.starts_with('@') {
            return self.start_section(trimmed);
        }

        let section = self
            .section
            .ok_or_else(|| eyre!("Line {}: content before the first section", self.line_no))?;
        let tokens = tokenize(trimmed).map_err(|e| eyre!("Line {}: {}", self.line_no, e))?;

        if section.has_header() && self.columns.is_none() {
            self.columns = Some(tokens);
            return Ok(());
        }

        match section {
            Section::Nodes => self.parse_node(tokens),
            Section::Arcs => self.parse_arc(tokens),
            Section::Attributes => self.parse_attribute(tokens),
            Section::Flows => self.parse_flow(tokens),
            Section::Conflicts => self.parse_conflict(tokens),
            Section::Unknown => Ok(()),
        }
    }

    fn parse_node(&mut self, tokens: Vec<String>) -> Result<()> {
        let columns = self.columns.clone().unwrap_or_default();
        if !columns.iter().any(|c| c == "label") {
            return Err(eyre!("Line {}: @nodes header has no 'label' column", self.line_no));
        }

        let mut label = None;
        let mut name = None;
        let mut weight = None;
        let mut attributes = HashMap::new();

        // Trailing cells may be missing, e.g. rows written as "0\tname\t"
        for (column, value) in columns.iter().zip(tokens) {
            match column.as_str() {
                "label" => label = Some(self.parse_u32(&value, "node label")?),
                "name" => name = Some(value),
                "weight" => {
                    weight = Some(
                        value
                            .parse::<f64>()
                            .map_err(|_| eyre!("Line {}: invalid node weight '{}'", self.line_no, value))?,
                    );
                }
                _ => {
                    attributes.insert(column.clone(), value);
                }
            }
        }

        let label = label.ok_or_else(|| eyre!("Line {}: node row missing label", self.line_no))?;
        self.doc.nodes.push(LgfNode { label, name, weight, attributes });
        Ok(())
    }

    fn parse_arc(&mut self, tokens: Vec<String>) -> Result<()> {
        if tokens.len() < 2 {
            return Err(eyre!("Line {}: arc row needs source and target", self.line_no));
        }
        let source = self.parse_u32(&tokens[0], "arc source")?;
        let target = self.parse_u32(&tokens[1], "arc target")?;

        let columns = self.columns.clone().unwrap_or_default();
        let label = match columns.iter().position(|c| c == "label") {
            Some(pos) => match tokens.get(pos + 2) {
                Some(value) => Some(self.parse_u32(value, "arc label")?),
                None => None,
            },
            None => None,
        };

        self.doc.arcs.push(LgfArc { source, target, label });
        Ok(())
    }

    fn parse_attribute(&mut self, tokens: Vec<String>) -> Result<()> {
        let mut tokens = tokens.into_iter();
        match (tokens.next(), tokens.next()) {
            (Some(key), Some(value)) => {
                self.doc.attributes.push((key, value));
                Ok(())
            }
            _ => Err(eyre!("Line {}: attribute row needs a key and a value", self.line_no)),
        }
    }

    fn parse_flow(&mut self, tokens: Vec<String>) -> Result<()> {
        let mut tokens = tokens.into_iter();
        match (tokens.next(), tokens.next()) {
            (Some(name), Some(modules)) => {
                let modules = modules.split(',').filter(|m| !m.is_empty()).map(str::to_string).collect();
                self.doc.flows.push(LgfFlow { name, modules });
                Ok(())
            }
            _ => Err(eyre!("Line {}: flow row needs a name and a module list", self.line_no)),
        }
    }

    fn parse_conflict(&mut self, tokens: Vec<String>) -> Result<()> {
        if tokens.len() < 2 {
            return Err(eyre!("Line {}: conflict row needs two node labels", self.line_no));
        }
        let first = self.parse_u32(&tokens[0], "conflict node")?;
        let second = self.parse_u32(&tokens[1], "conflict node")?;
        self.doc.conflicts.push((first, second));
        Ok(())
    }
}

/// Parse LGF text into an [`LgfDocument`]
pub fn parse_lgf(content: &str) -> Result<LgfDocument> {
    let mut parser = Parser::new();
    for (idx, line) in content.lines().enumerate() {
        parser.line_no = idx + 1;
        parser.parse_line(line)?;
    }
    Ok(parser.doc)
}

/// Parse an LGF file
pub fn parse_lgf_file(path: impl AsRef<Path>) -> Result<LgfDocument> {
    let path = path.as_ref();
    let content =
        fs::read_to_string(path).wrap_err_with(|| format!("Failed to read LGF file '{}'", path.display()))?;
    parse_lgf(&content).wrap_err_with(|| format!("Failed to parse LGF file '{}'", path.display()))
}
