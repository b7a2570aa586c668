//! Live pipeline topology conversion.
//!
//! A running pipeline can be dumped as a mapping from module name to the
//! names of its successors. This module loads such dumps and turns them into
//! a labelled node/arc graph that can be written as LGF.

pub mod convert;
pub mod types;

// Re-export key types and functions for easier access
pub use convert::{from_topology, load_topology};
pub use types::{TopologyEntry, TopologyGraph};
