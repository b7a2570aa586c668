//! LGF (LEMON graph format) reading and writing.
//!
//! The generator writes `@nodes`, `@arcs`, `@attributes`, `@flows` and
//! `@conflicts` sections; the reader accepts the same sections in any order
//! so that generated files and pipeline dumps can be checked after the fact.

pub mod parser;
pub mod validation;
pub mod writer;

pub use parser::{parse_lgf, parse_lgf_file, LgfArc, LgfDocument, LgfFlow, LgfNode, LgfSummary};
pub use validation::validate_document;
pub use writer::{render_graph, render_topology};
